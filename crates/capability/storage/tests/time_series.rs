use hms_storage::{
    InMemorySleepDataStore, InMemoryVitalsStore, SleepDataStore, SleepSampleRecord,
    VitalsSampleRecord, VitalsStore,
};

#[tokio::test]
async fn samples_filtered_and_ordered() {
    let store = InMemorySleepDataStore::new();
    for ts in [300i64, 100, 200, 900] {
        store
            .insert_sample(SleepSampleRecord {
                device_id: "dev-1".to_string(),
                ts,
                stage: 2,
                turn_over: false,
                active: 0,
            })
            .await
            .expect("insert");
    }
    let samples = store.list_samples("dev-1", 100, 300).await.expect("list");
    let times: Vec<i64> = samples.iter().map(|item| item.ts).collect();
    assert_eq!(times, vec![100, 200, 300]);
}

#[tokio::test]
async fn samples_scoped_by_device() {
    let store = InMemorySleepDataStore::new();
    store
        .insert_sample(SleepSampleRecord {
            device_id: "dev-1".to_string(),
            ts: 100,
            stage: 1,
            turn_over: false,
            active: 0,
        })
        .await
        .expect("insert");
    let samples = store.list_samples("dev-2", 0, 1000).await.expect("list");
    assert!(samples.is_empty());
}

#[tokio::test]
async fn vitals_range_is_inclusive() {
    let store = InMemoryVitalsStore::new();
    for ts in [100i64, 200] {
        store
            .insert_sample(VitalsSampleRecord {
                device_id: "dev-1".to_string(),
                ts,
                heart_rate: 60,
                breath_rate: 14,
                physical: 30,
            })
            .await
            .expect("insert");
    }
    let samples = store.list_samples("dev-1", 100, 200).await.expect("list");
    assert_eq!(samples.len(), 2);
}
