use domain::ConfirmState;
use hms_storage::{
    InMemoryShareStore, InMemoryTransferStore, ShareRecord, ShareStore, TransferRecord,
    TransferStore,
};

fn share(id: &str, from: &str, to: &str, device: &str, confirm: ConfirmState) -> ShareRecord {
    ShareRecord {
        share_id: id.to_string(),
        from_user_id: from.to_string(),
        to_user_id: to.to_string(),
        device_id: device.to_string(),
        remark: None,
        confirm,
    }
}

#[tokio::test]
async fn find_exact_ignores_confirm_state() {
    let store = InMemoryShareStore::new();
    store
        .insert(share("s-1", "user-1", "user-2", "dev-1", ConfirmState::Confirmed))
        .await
        .expect("insert");
    let found = store
        .find_exact("user-1", "user-2", "dev-1")
        .await
        .expect("query");
    assert!(found.is_some());
}

#[tokio::test]
async fn pending_lookup_skips_confirmed() {
    let store = InMemoryShareStore::new();
    store
        .insert(share("s-1", "user-1", "user-2", "dev-1", ConfirmState::Confirmed))
        .await
        .expect("insert");
    assert!(
        store
            .find_pending_for_recipient("user-2", "dev-1")
            .await
            .expect("query")
            .is_none()
    );
    store
        .insert(share("s-2", "user-3", "user-2", "dev-1", ConfirmState::Unconfirmed))
        .await
        .expect("insert");
    let pending = store
        .find_pending_for_recipient("user-2", "dev-1")
        .await
        .expect("query")
        .expect("pending");
    assert_eq!(pending.share_id, "s-2");
}

#[tokio::test]
async fn set_confirm_updates_row() {
    let store = InMemoryShareStore::new();
    store
        .insert(share("s-1", "user-1", "user-2", "dev-1", ConfirmState::Unconfirmed))
        .await
        .expect("insert");
    assert!(
        store
            .set_confirm("s-1", ConfirmState::Confirmed)
            .await
            .expect("update")
    );
    let found = store.find_share("s-1").await.expect("query").expect("row");
    assert_eq!(found.confirm, ConfirmState::Confirmed);
}

#[tokio::test]
async fn transfer_delete_for_device_removes_all() {
    let store = InMemoryTransferStore::new();
    for (id, to) in [("t-1", "user-2"), ("t-2", "user-3")] {
        store
            .insert(TransferRecord {
                transfer_id: id.to_string(),
                from_user_id: "user-1".to_string(),
                to_user_id: to.to_string(),
                device_id: "dev-1".to_string(),
                remark: None,
                confirm: ConfirmState::Unconfirmed,
            })
            .await
            .expect("insert");
    }
    let removed = store.delete_for_device("dev-1").await.expect("delete");
    assert_eq!(removed, 2);
    assert!(store.list_for_device("dev-1").await.expect("list").is_empty());
}
