//! 设备归属状态机。
//!
//! 驱动分享/转让/确认/撤销工作流，以及设备注册与关系移除边界。
//! 状态由 ShareRecord/TransferRecord 的存在与 confirm 字段加上
//! RelationRecord 共同编码：
//! `无关系 → 待确认 → 已确认`，待确认可被拒绝（删行）。
//!
//! 不变式：设备的关系集合为空、恰一条 Normal、或一条 Normal 加
//! 若干 Shared；任何操作序列都不会产生第二条 Normal。

mod compensation;
mod locks;

pub use compensation::{CompensationLog, CompensationStep};
pub use locks::DeviceLocks;

use domain::{ConfirmState, DeviceKind, RelationFlag, UserContext};
use hms_notify::{DeviceTopicBus, NotifyEvent, NotifyPublisher};
use hms_storage::{
    DevicePatch, DeviceRecord, DeviceStore, OverviewCache, RelationRecord, RelationStore,
    ShareRecord, ShareStore, StorageError, TransferRecord, TransferStore,
};
use hms_telemetry::{
    record_relation_removed, record_share_confirmed, record_share_initiated,
    record_share_rejected, record_transfer_confirmed,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 归属操作错误。
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    #[error("operation targets the caller itself")]
    SameUser,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("identical pending request already exists")]
    Duplicate,
    #[error("recipient already holds the normal relation")]
    AlreadyBound,
    #[error("caller has no permission on this record")]
    NoPermission,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for OwnershipError {
    fn from(err: StorageError) -> Self {
        OwnershipError::Storage(err.to_string())
    }
}

/// 设备注册输入。
#[derive(Debug, Clone)]
pub struct RegisterDevice {
    pub mac: String,
    pub name: String,
    pub kind: DeviceKind,
    pub remark: Option<String>,
}

/// 归属状态机引擎。
///
/// 所有变更操作先获取按设备串行的进程内锁，再执行查询-分支-写入，
/// 成功后向受影响用户发布通知（fire-and-forget）。
pub struct OwnershipEngine {
    devices: Arc<dyn DeviceStore>,
    relations: Arc<dyn RelationStore>,
    shares: Arc<dyn ShareStore>,
    transfers: Arc<dyn TransferStore>,
    notifier: Arc<dyn NotifyPublisher>,
    bus: Arc<dyn DeviceTopicBus>,
    overview: Arc<dyn OverviewCache>,
    locks: DeviceLocks,
}

impl OwnershipEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        relations: Arc<dyn RelationStore>,
        shares: Arc<dyn ShareStore>,
        transfers: Arc<dyn TransferStore>,
        notifier: Arc<dyn NotifyPublisher>,
        bus: Arc<dyn DeviceTopicBus>,
        overview: Arc<dyn OverviewCache>,
    ) -> Self {
        Self {
            devices,
            relations,
            shares,
            transfers,
            notifier,
            bus,
            overview,
            locks: DeviceLocks::new(),
        }
    }

    /// 注册设备（按 mac upsert）。
    ///
    /// 首次注册创建设备并绑定调用者为 Normal 拥有者；重复注册更新
    /// 设备字段。已有其他拥有者时拒绝（AlreadyBound）。
    pub async fn register_device(
        &self,
        ctx: &UserContext,
        input: RegisterDevice,
    ) -> Result<DeviceRecord, OwnershipError> {
        let _guard = self.locks.acquire(&input.mac).await;
        let existing = self.devices.find_by_mac(&input.mac).await?;
        let device = match existing {
            Some(device) => {
                let owner = self.relations.find_normal(&device.device_id).await?;
                if let Some(owner) = owner {
                    if owner.user_id != ctx.user_id {
                        return Err(OwnershipError::AlreadyBound);
                    }
                }
                let patch = DevicePatch {
                    name: Some(input.name),
                    kind: Some(input.kind),
                    remark: input.remark,
                };
                let updated = self
                    .devices
                    .update_device(&device.device_id, patch)
                    .await?
                    .ok_or(OwnershipError::NotFound("device"))?;
                if self.relations.find(&ctx.user_id, &updated.device_id).await?.is_none() {
                    self.relations
                        .insert(RelationRecord {
                            relation_id: uuid::Uuid::new_v4().to_string(),
                            user_id: ctx.user_id.clone(),
                            device_id: updated.device_id.clone(),
                            flag: RelationFlag::Normal,
                        })
                        .await?;
                }
                updated
            }
            None => {
                let record = DeviceRecord {
                    device_id: uuid::Uuid::new_v4().to_string(),
                    mac: input.mac.clone(),
                    name: input.name,
                    kind: input.kind,
                    remark: input.remark,
                };
                let created = self.devices.insert_device(record).await?;
                self.relations
                    .insert(RelationRecord {
                        relation_id: uuid::Uuid::new_v4().to_string(),
                        user_id: ctx.user_id.clone(),
                        device_id: created.device_id.clone(),
                        flag: RelationFlag::Normal,
                    })
                    .await?;
                created
            }
        };
        if let Err(err) = self.bus.subscribe_device(&device.mac).await {
            warn!(target: "hms.ownership", mac = %device.mac, "device subscribe failed: {}", err);
        }
        info!(
            target: "hms.ownership",
            user_id = %ctx.user_id,
            device_id = %device.device_id,
            mac = %device.mac,
            "device_registered"
        );
        self.publish(
            &ctx.user_id,
            NotifyEvent::new("deviceRegistered", device.device_id.clone()),
        )
        .await;
        Ok(device)
    }

    /// 发起分享。
    ///
    /// `wait_confirm = false` 时跳过待确认状态，立即执行与确认相同的
    /// 副作用；否则落库为未确认并向接收方发布确认请求事件。
    pub async fn initiate_share(
        &self,
        ctx: &UserContext,
        to_user_id: &str,
        device_id: &str,
        remark: Option<String>,
        wait_confirm: bool,
    ) -> Result<ShareRecord, OwnershipError> {
        if ctx.user_id == to_user_id {
            return Err(OwnershipError::SameUser);
        }
        let _guard = self.locks.acquire(device_id).await;
        self.devices
            .find_device(device_id)
            .await?
            .ok_or(OwnershipError::NotFound("device"))?;
        // 同 (from, to, device) 的分享无论确认状态一律拒绝重复
        if self
            .shares
            .find_exact(&ctx.user_id, to_user_id, device_id)
            .await?
            .is_some()
        {
            return Err(OwnershipError::Duplicate);
        }
        let record = ShareRecord {
            share_id: uuid::Uuid::new_v4().to_string(),
            from_user_id: ctx.user_id.clone(),
            to_user_id: to_user_id.to_string(),
            device_id: device_id.to_string(),
            remark: remark.clone(),
            confirm: ConfirmState::Unconfirmed,
        };
        let record = self.shares.insert(record).await?;
        record_share_initiated();
        info!(
            target: "hms.ownership",
            from_user_id = %record.from_user_id,
            to_user_id = %record.to_user_id,
            device_id = %record.device_id,
            share_id = %record.share_id,
            wait_confirm = wait_confirm,
            "share_initiated"
        );
        if !wait_confirm {
            return self.confirm_share_locked(to_user_id, device_id, true).await;
        }
        self.publish(
            to_user_id,
            NotifyEvent::new("shareRequested", device_id)
                .from_user(ctx.user_id.clone())
                .to_user(to_user_id)
                .share(record.share_id.clone())
                .remark(remark),
        )
        .await;
        Ok(record)
    }

    /// 接收方确认或拒绝分享。
    pub async fn confirm_share(
        &self,
        ctx: &UserContext,
        device_id: &str,
        accept: bool,
    ) -> Result<ShareRecord, OwnershipError> {
        let _guard = self.locks.acquire(device_id).await;
        self.confirm_share_locked(&ctx.user_id, device_id, accept).await
    }

    /// 确认逻辑本体；调用方必须已持有设备锁。
    async fn confirm_share_locked(
        &self,
        to_user_id: &str,
        device_id: &str,
        accept: bool,
    ) -> Result<ShareRecord, OwnershipError> {
        let share = self
            .shares
            .find_pending_for_recipient(to_user_id, device_id)
            .await?
            .ok_or(OwnershipError::NotFound("share"))?;

        if !accept {
            self.shares.delete(&share.share_id).await?;
            if let Some(relation) = self.relations.find(to_user_id, device_id).await? {
                if relation.flag == RelationFlag::Shared {
                    self.relations.delete(to_user_id, device_id).await?;
                }
            }
            record_share_rejected();
            info!(
                target: "hms.ownership",
                share_id = %share.share_id,
                device_id = %device_id,
                "share_rejected"
            );
            self.publish(
                &share.from_user_id,
                NotifyEvent::new("shareRejected", device_id)
                    .to_user(to_user_id)
                    .share(share.share_id.clone()),
            )
            .await;
            return Ok(share);
        }

        let mut log = CompensationLog::new();
        self.shares
            .set_confirm(&share.share_id, ConfirmState::Confirmed)
            .await?;
        log.push(CompensationStep::DeleteShare {
            share_id: share.share_id.clone(),
        });

        // Normal 拥有者不能同时成为同一设备的分享接收方
        match self.relations.find(to_user_id, device_id).await {
            Ok(Some(relation)) if relation.flag == RelationFlag::Normal => {
                log.rollback(
                    self.shares.as_ref(),
                    self.transfers.as_ref(),
                    self.relations.as_ref(),
                )
                .await;
                return Err(OwnershipError::AlreadyBound);
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                let inserted = self
                    .relations
                    .insert(RelationRecord {
                        relation_id: uuid::Uuid::new_v4().to_string(),
                        user_id: to_user_id.to_string(),
                        device_id: device_id.to_string(),
                        flag: RelationFlag::Shared,
                    })
                    .await;
                if let Err(err) = inserted {
                    log.rollback(
                        self.shares.as_ref(),
                        self.transfers.as_ref(),
                        self.relations.as_ref(),
                    )
                    .await;
                    return Err(err.into());
                }
            }
            Err(err) => {
                log.rollback(
                    self.shares.as_ref(),
                    self.transfers.as_ref(),
                    self.relations.as_ref(),
                )
                .await;
                return Err(err.into());
            }
        }

        record_share_confirmed();
        info!(
            target: "hms.ownership",
            share_id = %share.share_id,
            device_id = %device_id,
            to_user_id = %to_user_id,
            "share_confirmed"
        );
        self.publish(
            &share.from_user_id,
            NotifyEvent::new("shareConfirmed", device_id)
                .to_user(to_user_id)
                .share(share.share_id.clone()),
        )
        .await;
        Ok(ShareRecord {
            confirm: ConfirmState::Confirmed,
            ..share
        })
    }

    /// 发起归属转让。
    pub async fn initiate_transfer(
        &self,
        ctx: &UserContext,
        to_user_id: &str,
        device_id: &str,
        remark: Option<String>,
    ) -> Result<TransferRecord, OwnershipError> {
        if ctx.user_id == to_user_id {
            return Err(OwnershipError::SameUser);
        }
        let _guard = self.locks.acquire(device_id).await;
        self.devices
            .find_device(device_id)
            .await?
            .ok_or(OwnershipError::NotFound("device"))?;
        if self
            .transfers
            .find_exact(&ctx.user_id, to_user_id, device_id)
            .await?
            .is_some()
        {
            return Err(OwnershipError::Duplicate);
        }
        let record = TransferRecord {
            transfer_id: uuid::Uuid::new_v4().to_string(),
            from_user_id: ctx.user_id.clone(),
            to_user_id: to_user_id.to_string(),
            device_id: device_id.to_string(),
            remark: remark.clone(),
            confirm: ConfirmState::Unconfirmed,
        };
        let record = self.transfers.insert(record).await?;
        info!(
            target: "hms.ownership",
            from_user_id = %record.from_user_id,
            to_user_id = %record.to_user_id,
            device_id = %record.device_id,
            transfer_id = %record.transfer_id,
            "transfer_initiated"
        );
        self.publish(
            to_user_id,
            NotifyEvent::new("transferRequested", device_id)
                .from_user(ctx.user_id.clone())
                .to_user(to_user_id)
                .remark(remark),
        )
        .await;
        Ok(record)
    }

    /// 接收方确认或拒绝转让。
    ///
    /// 确认时：删除原拥有者的 Normal 关系与其对该设备的全部分享授权，
    /// 再为接收方写入新的 Normal 关系。接收方已持有 Normal 时拒绝并
    /// 删除待确认行（AlreadyBound）。
    pub async fn confirm_transfer(
        &self,
        ctx: &UserContext,
        device_id: &str,
        accept: bool,
    ) -> Result<TransferRecord, OwnershipError> {
        let _guard = self.locks.acquire(device_id).await;
        let transfer = self
            .transfers
            .find_pending_for_recipient(&ctx.user_id, device_id)
            .await?
            .ok_or(OwnershipError::NotFound("transfer"))?;

        if !accept {
            self.transfers.delete(&transfer.transfer_id).await?;
            info!(
                target: "hms.ownership",
                transfer_id = %transfer.transfer_id,
                device_id = %device_id,
                "transfer_rejected"
            );
            self.publish(
                &transfer.from_user_id,
                NotifyEvent::new("transferRejected", device_id).to_user(ctx.user_id.clone()),
            )
            .await;
            return Ok(transfer);
        }

        if let Some(relation) = self.relations.find(&ctx.user_id, device_id).await? {
            if relation.flag == RelationFlag::Normal {
                self.transfers.delete(&transfer.transfer_id).await?;
                return Err(OwnershipError::AlreadyBound);
            }
        }

        let mut log = CompensationLog::new();
        self.transfers
            .set_confirm(&transfer.transfer_id, ConfirmState::Confirmed)
            .await?;
        log.push(CompensationStep::DeleteTransfer {
            transfer_id: transfer.transfer_id.clone(),
        });

        let cascade = self.transfer_cascade(&transfer, &ctx.user_id).await;
        if let Err(err) = cascade {
            log.rollback(
                self.shares.as_ref(),
                self.transfers.as_ref(),
                self.relations.as_ref(),
            )
            .await;
            return Err(err);
        }

        record_transfer_confirmed();
        info!(
            target: "hms.ownership",
            transfer_id = %transfer.transfer_id,
            device_id = %device_id,
            from_user_id = %transfer.from_user_id,
            to_user_id = %ctx.user_id,
            "transfer_confirmed"
        );
        self.publish(
            &transfer.from_user_id,
            NotifyEvent::new("transferConfirmed", device_id).to_user(ctx.user_id.clone()),
        )
        .await;
        Ok(TransferRecord {
            confirm: ConfirmState::Confirmed,
            ..transfer
        })
    }

    /// 转让确认的级联删除与新 Normal 写入。
    async fn transfer_cascade(
        &self,
        transfer: &TransferRecord,
        to_user_id: &str,
    ) -> Result<(), OwnershipError> {
        let device_id = transfer.device_id.as_str();
        // 原拥有者的 Normal 关系
        if let Some(owner) = self.relations.find(&transfer.from_user_id, device_id).await? {
            if owner.flag == RelationFlag::Normal {
                self.relations
                    .delete(&transfer.from_user_id, device_id)
                    .await?;
            }
        }
        // 原拥有者对该设备的全部分享授权（分享行 + 接收方的 Shared 关系）
        let grants = self
            .shares
            .list_from_user_for_device(&transfer.from_user_id, device_id)
            .await?;
        for grant in grants {
            if let Some(relation) = self.relations.find(&grant.to_user_id, device_id).await? {
                if relation.flag == RelationFlag::Shared {
                    self.relations.delete(&grant.to_user_id, device_id).await?;
                }
            }
            self.shares.delete(&grant.share_id).await?;
        }
        // 接收方可能仍残留 Shared 关系（非原拥有者授予的）
        if let Some(relation) = self.relations.find(to_user_id, device_id).await? {
            if relation.flag == RelationFlag::Shared {
                self.relations.delete(to_user_id, device_id).await?;
            }
        }
        self.relations
            .insert(RelationRecord {
                relation_id: uuid::Uuid::new_v4().to_string(),
                user_id: to_user_id.to_string(),
                device_id: device_id.to_string(),
                flag: RelationFlag::Normal,
            })
            .await?;
        Ok(())
    }

    /// 发起方撤销分享。
    pub async fn revoke_share(
        &self,
        ctx: &UserContext,
        share_id: &str,
    ) -> Result<(), OwnershipError> {
        let share = self
            .shares
            .find_share(share_id)
            .await?
            .ok_or(OwnershipError::NotFound("share"))?;
        if share.from_user_id != ctx.user_id {
            return Err(OwnershipError::NoPermission);
        }
        let _guard = self.locks.acquire(&share.device_id).await;
        self.shares.delete(share_id).await?;
        if let Some(relation) = self
            .relations
            .find(&share.to_user_id, &share.device_id)
            .await?
        {
            if relation.flag == RelationFlag::Shared {
                self.relations
                    .delete(&share.to_user_id, &share.device_id)
                    .await?;
            }
        }
        record_share_rejected();
        info!(
            target: "hms.ownership",
            share_id = %share_id,
            device_id = %share.device_id,
            "share_revoked"
        );
        self.publish(
            &share.to_user_id,
            NotifyEvent::new("shareRevoked", share.device_id.clone())
                .from_user(ctx.user_id.clone())
                .share(share_id),
        )
        .await;
        Ok(())
    }

    /// 移除调用者与设备的关系。
    ///
    /// 移除 Normal（拥有者解绑）时级联：删除其全部分享授权与设备的
    /// 全部转让记录，失效设备总览缓存并退订设备主题。移除 Shared
    /// 只删除该用户自己的分享记录，归属不受影响。
    pub async fn remove_user_device(
        &self,
        ctx: &UserContext,
        device_id: &str,
    ) -> Result<(), OwnershipError> {
        let _guard = self.locks.acquire(device_id).await;
        let relation = self
            .relations
            .find(&ctx.user_id, device_id)
            .await?
            .ok_or(OwnershipError::NotFound("relation"))?;
        self.relations.delete(&ctx.user_id, device_id).await?;

        match relation.flag {
            RelationFlag::Normal => {
                let grants = self
                    .shares
                    .list_from_user_for_device(&ctx.user_id, device_id)
                    .await?;
                for grant in grants {
                    if let Some(shared) =
                        self.relations.find(&grant.to_user_id, device_id).await?
                    {
                        if shared.flag == RelationFlag::Shared {
                            self.relations.delete(&grant.to_user_id, device_id).await?;
                        }
                    }
                    self.shares.delete(&grant.share_id).await?;
                }
                self.transfers.delete_for_device(device_id).await?;
                if let Err(err) = self.overview.invalidate_overview(device_id).await {
                    warn!(
                        target: "hms.ownership",
                        device_id = %device_id,
                        "overview invalidate failed: {}",
                        err
                    );
                }
                if let Some(device) = self.devices.find_device(device_id).await? {
                    if let Err(err) = self.bus.unsubscribe_device(&device.mac).await {
                        warn!(
                            target: "hms.ownership",
                            mac = %device.mac,
                            "device unsubscribe failed: {}",
                            err
                        );
                    }
                }
            }
            RelationFlag::Shared => {
                let shares = self.shares.list_for_user(&ctx.user_id).await?;
                for share in shares
                    .into_iter()
                    .filter(|item| item.to_user_id == ctx.user_id && item.device_id == device_id)
                {
                    self.shares.delete(&share.share_id).await?;
                }
            }
        }

        record_relation_removed();
        info!(
            target: "hms.ownership",
            user_id = %ctx.user_id,
            device_id = %device_id,
            flag = %relation.flag,
            "relation_removed"
        );
        self.publish(
            &ctx.user_id,
            NotifyEvent::new("relationRemoved", device_id).to_user(ctx.user_id.clone()),
        )
        .await;
        Ok(())
    }

    /// fire-and-forget 发布；失败记录日志，不向上传播。
    async fn publish(&self, user_id: &str, event: NotifyEvent) {
        if let Err(err) = self.notifier.publish(user_id, &event).await {
            warn!(
                target: "hms.ownership",
                user_id = %user_id,
                event_kind = %event.kind,
                "notify publish failed: {}",
                err
            );
        }
    }
}
