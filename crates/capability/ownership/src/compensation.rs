//! 补偿删除步骤表。
//!
//! 多步确认流程没有事务包裹；后续步骤失败时按记录的补偿步骤
//! 逆序删除已写入的行。补偿本身失败只记录日志，不再级联。

use hms_storage::{RelationStore, ShareStore, TransferStore};
use tracing::warn;

/// 可补偿的写入步骤。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompensationStep {
    DeleteShare { share_id: String },
    DeleteTransfer { transfer_id: String },
    DeleteRelation { user_id: String, device_id: String },
}

/// 已执行写入的补偿日志，逆序回滚。
#[derive(Debug, Default)]
pub struct CompensationLog {
    steps: Vec<CompensationStep>,
}

impl CompensationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: CompensationStep) {
        self.steps.push(step);
    }

    /// 已记录的步骤（测试用）。
    pub fn steps(&self) -> &[CompensationStep] {
        &self.steps
    }

    /// 逆序执行补偿删除。
    pub async fn rollback(
        self,
        shares: &dyn ShareStore,
        transfers: &dyn TransferStore,
        relations: &dyn RelationStore,
    ) {
        for step in self.steps.into_iter().rev() {
            let result = match &step {
                CompensationStep::DeleteShare { share_id } => {
                    shares.delete(share_id).await.map(|_| ())
                }
                CompensationStep::DeleteTransfer { transfer_id } => {
                    transfers.delete(transfer_id).await.map(|_| ())
                }
                CompensationStep::DeleteRelation { user_id, device_id } => {
                    relations.delete(user_id, device_id).await.map(|_| ())
                }
            };
            if let Err(err) = result {
                warn!(
                    target: "hms.ownership",
                    step = ?step,
                    "compensation delete failed: {}",
                    err
                );
            }
        }
    }
}
