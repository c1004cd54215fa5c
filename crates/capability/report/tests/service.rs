use domain::DeviceKind;
use hms_report::{ReportError, ReportService};
use hms_storage::{
    DeviceRecord, InMemorySleepDataStore, InMemoryVitalsStore, SleepDataStore, SleepPeriodRecord,
    SleepSampleRecord, VitalsSampleRecord, VitalsStore,
};
use std::sync::Arc;

fn device(kind: DeviceKind) -> DeviceRecord {
    DeviceRecord {
        device_id: "dev-1".to_string(),
        mac: "AA:BB:CC:DD:EE:01".to_string(),
        name: "monitor".to_string(),
        kind,
        remark: None,
    }
}

fn service(
    sleep_data: Arc<InMemorySleepDataStore>,
    vitals: Arc<InMemoryVitalsStore>,
) -> ReportService {
    ReportService::new(sleep_data, vitals)
}

#[tokio::test]
async fn heart_rate_device_uses_sample_stream() {
    let sleep_data = Arc::new(InMemorySleepDataStore::new());
    let vitals = Arc::new(InMemoryVitalsStore::new());
    for (ts, stage) in [(0i64, 1i16), (300, 2), (600, 2)] {
        sleep_data
            .insert_sample(SleepSampleRecord {
                device_id: "dev-1".to_string(),
                ts,
                stage,
                turn_over: false,
                active: 0,
            })
            .await
            .expect("insert");
    }
    let report = service(sleep_data, vitals)
        .sleep_report(&device(DeviceKind::HeartRate), 0, 600)
        .await
        .expect("report");
    assert_eq!(report.awake_long, 300);
    assert_eq!(report.sleep_light, 300);
}

#[tokio::test]
async fn ed713_device_uses_periodized_stream() {
    let sleep_data = Arc::new(InMemorySleepDataStore::new());
    let vitals = Arc::new(InMemoryVitalsStore::new());
    for (ts, periodization) in [(0i64, 2i16), (300, 3)] {
        sleep_data
            .insert_period(SleepPeriodRecord {
                device_id: "dev-1".to_string(),
                ts,
                periodization,
                event: 0,
                session_start: 0,
                session_end: 600,
            })
            .await
            .expect("insert");
    }
    let report = service(sleep_data, vitals)
        .sleep_report(&device(DeviceKind::Ed713), 0, 600)
        .await
        .expect("report");
    assert_eq!(report.sleep_light, 300);
    // 仍打开的深睡用声明的会话结束时间闭合
    assert_eq!(report.sleep_deep, 300);
    assert_eq!(report.end_time, 600);
    assert_eq!(report.sleep_num, 1);
}

#[tokio::test]
async fn lamp_device_has_no_source() {
    let sleep_data = Arc::new(InMemorySleepDataStore::new());
    let vitals = Arc::new(InMemoryVitalsStore::new());
    let err = service(sleep_data, vitals)
        .sleep_report(&device(DeviceKind::Lamp), 0, 600)
        .await
        .expect_err("must fail");
    assert!(matches!(err, ReportError::Unsupported(_)));
}

#[tokio::test]
async fn vitals_stats_bins_store_samples() {
    let sleep_data = Arc::new(InMemorySleepDataStore::new());
    let vitals = Arc::new(InMemoryVitalsStore::new());
    for ts in [0i64, 60, 120] {
        vitals
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
    let stats = service(sleep_data, vitals)
        .vitals_stats(&device(DeviceKind::HeartRate), 0, 600)
        .await
        .expect("stats");
    assert_eq!(stats.avg_heart_rate, 60);
    assert_eq!(stats.windows.len(), 1);
}
