use domain::RelationFlag;
use hms_storage::{InMemoryRelationStore, RelationRecord, RelationStore};

fn relation(id: &str, user: &str, device: &str, flag: RelationFlag) -> RelationRecord {
    RelationRecord {
        relation_id: id.to_string(),
        user_id: user.to_string(),
        device_id: device.to_string(),
        flag,
    }
}

#[tokio::test]
async fn find_normal_returns_owner() {
    let store = InMemoryRelationStore::new();
    store
        .insert(relation("rel-1", "user-1", "dev-1", RelationFlag::Normal))
        .await
        .expect("insert");
    store
        .insert(relation("rel-2", "user-2", "dev-1", RelationFlag::Shared))
        .await
        .expect("insert");
    let owner = store
        .find_normal("dev-1")
        .await
        .expect("query")
        .expect("owner");
    assert_eq!(owner.user_id, "user-1");
}

#[tokio::test]
async fn relation_row_unique_per_pair() {
    let store = InMemoryRelationStore::new();
    store
        .insert(relation("rel-1", "user-1", "dev-1", RelationFlag::Normal))
        .await
        .expect("insert");
    let duplicate = store
        .insert(relation("rel-2", "user-1", "dev-1", RelationFlag::Shared))
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn delete_by_pair() {
    let store = InMemoryRelationStore::new();
    store
        .insert(relation("rel-1", "user-1", "dev-1", RelationFlag::Shared))
        .await
        .expect("insert");
    assert!(store.delete("user-1", "dev-1").await.expect("delete"));
    assert!(!store.delete("user-1", "dev-1").await.expect("delete again"));
    assert!(store.find("user-1", "dev-1").await.expect("find").is_none());
}

#[tokio::test]
async fn empty_ids_rejected() {
    let store = InMemoryRelationStore::new();
    assert!(store.find("", "dev-1").await.is_err());
    assert!(store.find("user-1", "").await.is_err());
}
