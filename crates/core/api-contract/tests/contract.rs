use api_contract::{
    InitiateShareRequest, RefreshTokenRequest, ShareDto, SleepReportDto, SleepSessionDto,
    StageSegmentDto,
};
use serde_json::Value;

#[test]
fn share_request_accepts_camel_case() {
    let payload = r#"{"toUserId":"user-2","deviceId":"dev-1","waitConfirm":true}"#;
    let req: InitiateShareRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.to_user_id, "user-2");
    assert_eq!(req.device_id, "dev-1");
    assert_eq!(req.wait_confirm, Some(true));
    assert!(req.remark.is_none());
}

#[test]
fn share_dto_is_camel_case() {
    let dto = ShareDto {
        share_id: "share-1".to_string(),
        from_user_id: "user-1".to_string(),
        to_user_id: "user-2".to_string(),
        device_id: "dev-1".to_string(),
        remark: None,
        confirm: "unconfirmed".to_string(),
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert!(value.get("fromUserId").is_some());
    assert!(value.get("toUserId").is_some());
    assert!(value.get("from_user_id").is_none());
}

#[test]
fn refresh_token_request_accepts_both_cases() {
    let req: RefreshTokenRequest =
        serde_json::from_str(r#"{"refreshToken":"token-1"}"#).expect("parse");
    assert_eq!(req.refresh_token, "token-1");
    let req: RefreshTokenRequest =
        serde_json::from_str(r#"{"refresh_token":"token-2"}"#).expect("parse");
    assert_eq!(req.refresh_token, "token-2");
}

#[test]
fn sleep_report_durations_are_numbers() {
    let dto = SleepReportDto {
        start_time: 1_700_000_000,
        end_time: 1_700_028_800,
        sleep_num: 1,
        sleep_light: 3600,
        sleep_deep: 1800,
        sleep_long: 5400,
        awake_long: 600,
        turn_over: 3,
        leave_bed_num: 1,
        leave_bed_time: vec![1_700_010_000],
        sleep_time_list: vec![SleepSessionDto {
            begin: 1_700_000_600,
            end: 1_700_006_000,
        }],
        stages_sleep_time: vec![StageSegmentDto {
            stage: "light".to_string(),
            begin: 1_700_000_600,
            end: 1_700_004_200,
        }],
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert!(matches!(value.get("sleepLong"), Some(Value::Number(_))));
    assert!(matches!(value.get("awakeLong"), Some(Value::Number(_))));
    assert!(value.get("stagesSleepTime").is_some());
    assert!(value.get("sleep_long").is_none());
}
