use hms_telemetry::{metrics, new_request_ids, record_notify_published};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot().notify_published;
    record_notify_published();
    let after = metrics().snapshot().notify_published;
    assert_eq!(after, before + 1);
}
