use domain::DeviceKind;
use hms_storage::{
    DevicePatch, DeviceRecord, DeviceStore, InMemoryDeviceStore, InMemoryUserStore, UserStore,
};

#[tokio::test]
async fn find_default_admin() {
    let store = InMemoryUserStore::with_default_admin();
    let user = store
        .find_by_username("admin")
        .await
        .expect("query")
        .expect("admin");
    assert_eq!(user.username, "admin");
    assert_eq!(user.user_id, "user-admin");
}

#[tokio::test]
async fn refresh_jti_round_trips() {
    let store = InMemoryUserStore::with_default_admin();
    assert!(
        store
            .set_refresh_jti("user-admin", Some("jti-1"))
            .await
            .expect("set")
    );
    let jti = store.get_refresh_jti("user-admin").await.expect("get");
    assert_eq!(jti.as_deref(), Some("jti-1"));
    assert!(store.set_refresh_jti("user-admin", None).await.expect("clear"));
    assert!(store.get_refresh_jti("user-admin").await.expect("get").is_none());
}

#[tokio::test]
async fn device_found_by_mac() {
    let store = InMemoryDeviceStore::new();
    let record = DeviceRecord {
        device_id: "dev-1".to_string(),
        mac: "AA:BB:CC:DD:EE:01".to_string(),
        name: "bedroom monitor".to_string(),
        kind: DeviceKind::HeartRate,
        remark: None,
    };
    store.insert_device(record).await.expect("insert");
    let found = store
        .find_by_mac("AA:BB:CC:DD:EE:01")
        .await
        .expect("query")
        .expect("device");
    assert_eq!(found.device_id, "dev-1");
}

#[tokio::test]
async fn device_mac_is_unique() {
    let store = InMemoryDeviceStore::new();
    let record = DeviceRecord {
        device_id: "dev-1".to_string(),
        mac: "AA:BB:CC:DD:EE:01".to_string(),
        name: "one".to_string(),
        kind: DeviceKind::Ed713,
        remark: None,
    };
    store.insert_device(record.clone()).await.expect("insert");
    let duplicate = DeviceRecord {
        device_id: "dev-2".to_string(),
        ..record
    };
    assert!(store.insert_device(duplicate).await.is_err());
}

#[tokio::test]
async fn device_patch_keeps_missing_fields() {
    let store = InMemoryDeviceStore::new();
    store
        .insert_device(DeviceRecord {
            device_id: "dev-1".to_string(),
            mac: "AA:BB:CC:DD:EE:02".to_string(),
            name: "old name".to_string(),
            kind: DeviceKind::X1,
            remark: Some("ward 3".to_string()),
        })
        .await
        .expect("insert");
    let updated = store
        .update_device(
            "dev-1",
            DevicePatch {
                name: Some("new name".to_string()),
                ..DevicePatch::default()
            },
        )
        .await
        .expect("update")
        .expect("device");
    assert_eq!(updated.name, "new name");
    assert_eq!(updated.kind, DeviceKind::X1);
    assert_eq!(updated.remark.as_deref(), Some("ward 3"));
}
