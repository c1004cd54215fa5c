use domain::{DeviceKind, RelationFlag, SleepStage, UserContext};

#[test]
fn user_context_builds() {
    let ctx = UserContext::new("user-1", "alice");

    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.username, "alice");
}

#[test]
fn device_kind_round_trips() {
    for kind in [
        DeviceKind::HeartRate,
        DeviceKind::FallCheck,
        DeviceKind::Lamp,
        DeviceKind::Ed713,
        DeviceKind::X1,
        DeviceKind::X1s,
        DeviceKind::H03,
        DeviceKind::T1,
    ] {
        let parsed: DeviceKind = kind.as_str().parse().expect("parse");
        assert_eq!(parsed, kind);
    }
    assert!("ed999".parse::<DeviceKind>().is_err());
}

#[test]
fn relation_flag_parses() {
    assert_eq!("normal".parse::<RelationFlag>(), Ok(RelationFlag::Normal));
    assert_eq!("shared".parse::<RelationFlag>(), Ok(RelationFlag::Shared));
}

#[test]
fn period_code_zero_is_no_stage() {
    assert_eq!(SleepStage::from_period_code(0), None);
    assert_eq!(SleepStage::from_period_code(2), Some(SleepStage::Light));
    assert_eq!(SleepStage::from_sample_code(3), Some(SleepStage::Deep));
    assert_eq!(SleepStage::from_sample_code(0), None);
}
