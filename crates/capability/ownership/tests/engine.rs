use domain::{ConfirmState, DeviceKind, RelationFlag, UserContext};
use hms_notify::NoopNotifier;
use hms_ownership::{OwnershipEngine, OwnershipError, RegisterDevice};
use hms_storage::{
    InMemoryDeviceStore, InMemoryOverviewCache, InMemoryRelationStore, InMemoryShareStore,
    InMemoryTransferStore, OverviewCache, RelationStore, ShareStore, TransferStore,
};
use std::sync::Arc;

struct Harness {
    engine: OwnershipEngine,
    relations: Arc<InMemoryRelationStore>,
    shares: Arc<InMemoryShareStore>,
    transfers: Arc<InMemoryTransferStore>,
    overview: Arc<InMemoryOverviewCache>,
}

fn harness() -> Harness {
    let devices = Arc::new(InMemoryDeviceStore::new());
    let relations = Arc::new(InMemoryRelationStore::new());
    let shares = Arc::new(InMemoryShareStore::new());
    let transfers = Arc::new(InMemoryTransferStore::new());
    let overview = Arc::new(InMemoryOverviewCache::new());
    let notifier = Arc::new(NoopNotifier);
    let engine = OwnershipEngine::new(
        devices.clone(),
        relations.clone(),
        shares.clone(),
        transfers.clone(),
        notifier.clone(),
        notifier,
        overview.clone(),
    );
    Harness {
        engine,
        relations,
        shares,
        transfers,
        overview,
    }
}

fn user(id: &str) -> UserContext {
    UserContext::new(id, id)
}

async fn register(harness: &Harness, owner: &UserContext, mac: &str) -> String {
    let device = harness
        .engine
        .register_device(
            owner,
            RegisterDevice {
                mac: mac.to_string(),
                name: "monitor".to_string(),
                kind: DeviceKind::HeartRate,
                remark: None,
            },
        )
        .await
        .expect("register");
    device.device_id
}

async fn normal_count(harness: &Harness, device_id: &str) -> usize {
    harness
        .relations
        .list_for_device(device_id)
        .await
        .expect("list")
        .iter()
        .filter(|item| item.flag == RelationFlag::Normal)
        .count()
}

#[tokio::test]
async fn register_binds_first_owner() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:01").await;
    let owner = harness
        .relations
        .find_normal(&device_id)
        .await
        .expect("query")
        .expect("owner");
    assert_eq!(owner.user_id, "user-alice");
}

#[tokio::test]
async fn reregister_by_owner_updates_device() {
    let harness = harness();
    let alice = user("user-alice");
    let first = register(&harness, &alice, "AA:02").await;
    let second = register(&harness, &alice, "AA:02").await;
    assert_eq!(first, second);
    assert_eq!(normal_count(&harness, &first).await, 1);
}

#[tokio::test]
async fn reregister_by_stranger_rejected() {
    let harness = harness();
    let alice = user("user-alice");
    let mallory = user("user-mallory");
    register(&harness, &alice, "AA:03").await;
    let err = harness
        .engine
        .register_device(
            &mallory,
            RegisterDevice {
                mac: "AA:03".to_string(),
                name: "hijack".to_string(),
                kind: DeviceKind::HeartRate,
                remark: None,
            },
        )
        .await
        .expect_err("must reject");
    assert!(matches!(err, OwnershipError::AlreadyBound));
}

#[tokio::test]
async fn share_to_self_rejected() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:04").await;
    let err = harness
        .engine
        .initiate_share(&alice, "user-alice", &device_id, None, true)
        .await
        .expect_err("must reject");
    assert!(matches!(err, OwnershipError::SameUser));
}

#[tokio::test]
async fn share_unknown_device_rejected() {
    let harness = harness();
    let alice = user("user-alice");
    let err = harness
        .engine
        .initiate_share(&alice, "user-bob", "dev-missing", None, true)
        .await
        .expect_err("must reject");
    assert!(matches!(err, OwnershipError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_share_rejected_once_pending() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:05").await;
    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect("first share");
    let err = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect_err("second share must fail");
    assert!(matches!(err, OwnershipError::Duplicate));
    let pending = harness
        .shares
        .list_from_user_for_device("user-alice", &device_id)
        .await
        .expect("list");
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn confirm_share_creates_shared_relation() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &alice, "AA:06").await;
    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect("initiate");
    let confirmed = harness
        .engine
        .confirm_share(&bob, &device_id, true)
        .await
        .expect("confirm");
    assert_eq!(confirmed.confirm, ConfirmState::Confirmed);
    let relation = harness
        .relations
        .find("user-bob", &device_id)
        .await
        .expect("query")
        .expect("relation");
    assert_eq!(relation.flag, RelationFlag::Shared);
    assert_eq!(normal_count(&harness, &device_id).await, 1);
}

#[tokio::test]
async fn share_without_wait_confirms_immediately() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:07").await;
    let record = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share");
    assert_eq!(record.confirm, ConfirmState::Confirmed);
    let relation = harness
        .relations
        .find("user-bob", &device_id)
        .await
        .expect("query")
        .expect("relation");
    assert_eq!(relation.flag, RelationFlag::Shared);
}

#[tokio::test]
async fn reject_share_deletes_row() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &alice, "AA:08").await;
    let record = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect("initiate");
    harness
        .engine
        .confirm_share(&bob, &device_id, false)
        .await
        .expect("reject");
    assert!(
        harness
            .shares
            .find_share(&record.share_id)
            .await
            .expect("query")
            .is_none()
    );
    assert!(
        harness
            .relations
            .find("user-bob", &device_id)
            .await
            .expect("query")
            .is_none()
    );
}

// 性质 3：接收方已持有 Normal 时确认必须失败，分享行被删除，
// 关系表保持原样（恰一条 Normal）。
#[tokio::test]
async fn confirm_share_exclusive_with_ownership() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &bob, "AA:09").await;
    // alice 向 bob 分享 bob 自己拥有的设备
    let record = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect("initiate");
    let err = harness
        .engine
        .confirm_share(&bob, &device_id, true)
        .await
        .expect_err("must fail");
    assert!(matches!(err, OwnershipError::AlreadyBound));
    assert!(
        harness
            .shares
            .find_share(&record.share_id)
            .await
            .expect("query")
            .is_none()
    );
    let relations = harness
        .relations
        .list_for_device(&device_id)
        .await
        .expect("list");
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].flag, RelationFlag::Normal);
    assert_eq!(relations[0].user_id, "user-bob");
}

// 性质 4：A 拥有并分享给 B、C 后向 B 转让；确认后 B 持有 Normal，
// A 无任何关系，A 的两条分享授权全部消失。
#[tokio::test]
async fn transfer_confirm_cascades() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &alice, "AA:10").await;
    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share to bob");
    harness
        .engine
        .initiate_share(&alice, "user-carol", &device_id, None, false)
        .await
        .expect("share to carol");
    harness
        .engine
        .initiate_transfer(&alice, "user-bob", &device_id, None)
        .await
        .expect("initiate transfer");
    let confirmed = harness
        .engine
        .confirm_transfer(&bob, &device_id, true)
        .await
        .expect("confirm transfer");
    assert_eq!(confirmed.confirm, ConfirmState::Confirmed);

    let bob_relation = harness
        .relations
        .find("user-bob", &device_id)
        .await
        .expect("query")
        .expect("bob relation");
    assert_eq!(bob_relation.flag, RelationFlag::Normal);
    assert!(
        harness
            .relations
            .find("user-alice", &device_id)
            .await
            .expect("query")
            .is_none()
    );
    assert!(
        harness
            .relations
            .find("user-carol", &device_id)
            .await
            .expect("query")
            .is_none()
    );
    let alice_grants = harness
        .shares
        .list_from_user_for_device("user-alice", &device_id)
        .await
        .expect("list");
    assert!(alice_grants.is_empty());
    assert_eq!(normal_count(&harness, &device_id).await, 1);
}

#[tokio::test]
async fn transfer_confirm_blocked_for_current_owner() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &bob, "AA:11").await;
    harness
        .engine
        .initiate_transfer(&alice, "user-bob", &device_id, None)
        .await
        .expect("initiate");
    let err = harness
        .engine
        .confirm_transfer(&bob, &device_id, true)
        .await
        .expect_err("must fail");
    assert!(matches!(err, OwnershipError::AlreadyBound));
    // 待确认行已被删除，不可重试
    assert!(
        harness
            .transfers
            .find_pending_for_recipient("user-bob", &device_id)
            .await
            .expect("query")
            .is_none()
    );
    assert_eq!(normal_count(&harness, &device_id).await, 1);
}

#[tokio::test]
async fn revoke_share_removes_grant() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:12").await;
    let record = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share");
    harness
        .engine
        .revoke_share(&alice, &record.share_id)
        .await
        .expect("revoke");
    assert!(
        harness
            .shares
            .find_share(&record.share_id)
            .await
            .expect("query")
            .is_none()
    );
    assert!(
        harness
            .relations
            .find("user-bob", &device_id)
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn revoke_requires_initiator() {
    let harness = harness();
    let alice = user("user-alice");
    let mallory = user("user-mallory");
    let device_id = register(&harness, &alice, "AA:13").await;
    let record = harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, true)
        .await
        .expect("share");
    let err = harness
        .engine
        .revoke_share(&mallory, &record.share_id)
        .await
        .expect_err("must reject");
    assert!(matches!(err, OwnershipError::NoPermission));
}

#[tokio::test]
async fn remove_owner_cascades() {
    let harness = harness();
    let alice = user("user-alice");
    let device_id = register(&harness, &alice, "AA:14").await;
    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share");
    harness
        .engine
        .initiate_transfer(&alice, "user-carol", &device_id, None)
        .await
        .expect("transfer pending");
    harness
        .overview
        .put_overview(&device_id, "{\"cached\":true}")
        .await
        .expect("seed cache");

    harness
        .engine
        .remove_user_device(&alice, &device_id)
        .await
        .expect("remove");

    assert!(
        harness
            .relations
            .list_for_device(&device_id)
            .await
            .expect("list")
            .is_empty()
    );
    assert!(
        harness
            .shares
            .list_from_user_for_device("user-alice", &device_id)
            .await
            .expect("list")
            .is_empty()
    );
    assert!(
        harness
            .transfers
            .list_for_device(&device_id)
            .await
            .expect("list")
            .is_empty()
    );
    assert!(
        harness
            .overview
            .get_overview(&device_id)
            .await
            .expect("cache")
            .is_none()
    );
}

#[tokio::test]
async fn remove_shared_keeps_ownership() {
    let harness = harness();
    let alice = user("user-alice");
    let bob = user("user-bob");
    let device_id = register(&harness, &alice, "AA:15").await;
    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share");
    harness
        .engine
        .remove_user_device(&bob, &device_id)
        .await
        .expect("remove shared");
    let owner = harness
        .relations
        .find_normal(&device_id)
        .await
        .expect("query")
        .expect("owner");
    assert_eq!(owner.user_id, "user-alice");
    assert!(
        harness
            .relations
            .find("user-bob", &device_id)
            .await
            .expect("query")
            .is_none()
    );
}

// 性质 1：任意操作序列后每个检查点都至多一条 Normal 关系。
#[tokio::test]
async fn single_owner_invariant_holds_through_workflow() {
    let harness = harness();
    let alice = user("user-alice");
    let carol = user("user-carol");
    let device_id = register(&harness, &alice, "AA:16").await;
    assert_eq!(normal_count(&harness, &device_id).await, 1);

    harness
        .engine
        .initiate_share(&alice, "user-bob", &device_id, None, false)
        .await
        .expect("share bob");
    assert_eq!(normal_count(&harness, &device_id).await, 1);

    harness
        .engine
        .initiate_transfer(&alice, "user-carol", &device_id, None)
        .await
        .expect("transfer carol");
    assert_eq!(normal_count(&harness, &device_id).await, 1);

    harness
        .engine
        .confirm_transfer(&carol, &device_id, true)
        .await
        .expect("confirm transfer");
    assert_eq!(normal_count(&harness, &device_id).await, 1);

    // 原拥有者的分享授权随转让消失，bob 可重新接受 carol 的分享
    harness
        .engine
        .initiate_share(&carol, "user-bob", &device_id, None, false)
        .await
        .expect("share bob again");
    assert_eq!(normal_count(&harness, &device_id).await, 1);

    harness
        .engine
        .remove_user_device(&carol, &device_id)
        .await
        .expect("owner detaches");
    assert_eq!(normal_count(&harness, &device_id).await, 0);
}
