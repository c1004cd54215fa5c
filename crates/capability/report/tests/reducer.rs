use domain::SleepStage;
use hms_report::{StagePeriod, StageSample, clamped_awake, reduce_periods, reduce_samples};

fn sample(ts: i64, stage_code: i16) -> StageSample {
    StageSample {
        ts,
        stage_code,
        turn_over: false,
    }
}

fn period(ts: i64, periodization: i16, event: i16, session: (i64, i64)) -> StagePeriod {
    StagePeriod {
        ts,
        periodization,
        event,
        session_start: session.0,
        session_end: session.1,
    }
}

#[test]
fn empty_sample_stream_yields_default() {
    let report = reduce_samples(&[]);
    assert_eq!(report.sleep_num, 0);
    assert_eq!(report.sleep_long, 0);
    assert_eq!(report.awake_long, 0);
    assert!(report.stages_sleep_time.is_empty());
}

// 阶段切换关闭旧区间：清醒 0-5min，浅睡 5-35min，深睡 35-40min，
// 40min 处回到浅睡后流结束。
#[test]
fn sample_stream_segment_closure() {
    let samples = [
        sample(0, 1),
        sample(300, 2),
        sample(2100, 3),
        sample(2400, 2),
    ];
    let report = reduce_samples(&samples);
    assert_eq!(report.start_time, 0);
    assert_eq!(report.end_time, 2400);
    assert_eq!(report.awake_long, 300);
    assert_eq!(report.sleep_light, 1800);
    assert_eq!(report.sleep_deep, 300);
    assert_eq!(report.sleep_long, 2100);

    let light_segments: Vec<_> = report
        .stages_sleep_time
        .iter()
        .filter(|segment| segment.stage == SleepStage::Light)
        .collect();
    assert_eq!(light_segments.len(), 2);
    assert_eq!((light_segments[0].begin, light_segments[0].end), (300, 2100));
    assert_eq!((light_segments[1].begin, light_segments[1].end), (2400, 2400));
}

#[test]
fn sample_stream_counts_sessions_and_turnovers() {
    let samples = [
        sample(0, 1),
        StageSample {
            ts: 60,
            stage_code: 2,
            turn_over: true,
        },
        sample(120, 3),
        sample(180, 1),
        sample(240, 2),
    ];
    let report = reduce_samples(&samples);
    assert_eq!(report.turn_over, 1);
    assert_eq!(report.sleep_num, 2);
    assert_eq!(report.sleep_time_list.len(), 2);
    assert_eq!(report.sleep_time_list[0].begin, 60);
    assert_eq!(report.sleep_time_list[0].end, 180);
    // 末段会话在流结束处闭合
    assert_eq!(report.sleep_time_list[1].begin, 240);
    assert_eq!(report.sleep_time_list[1].end, 240);
}

#[test]
fn awake_clamp_truncates_to_span() {
    assert_eq!(clamped_awake(2400, 2100, 300), 300);
    assert_eq!(clamped_awake(2400, 2100, 600), 300);
    assert_eq!(clamped_awake(2400, 2500, 600), 0);
}

#[test]
fn empty_period_stream_yields_default() {
    let report = reduce_periods(&[]);
    assert_eq!(report.sleep_num, 0);
    assert!(report.leave_bed_time.is_empty());
}

#[test]
fn period_stream_sessions_events_and_stages() {
    let periods = [
        period(1000, 1, 0, (1000, 2000)),
        period(1300, 2, 1, (1000, 2000)),
        period(1600, 3, 0, (1000, 2000)),
        period(1900, 0, 2, (1000, 2000)),
        period(5000, 2, 0, (5000, 6000)),
    ];
    let report = reduce_periods(&periods);
    assert_eq!(report.start_time, 1000);
    // 流结束取末条记录声明的会话结束时间
    assert_eq!(report.end_time, 6000);
    assert_eq!(report.sleep_num, 2);
    assert_eq!(report.sleep_time_list.len(), 2);
    assert_eq!(report.sleep_time_list[1].begin, 5000);
    assert_eq!(report.sleep_time_list[1].end, 6000);
    assert_eq!(report.turn_over, 1);
    assert_eq!(report.leave_bed_num, 1);
    assert_eq!(report.leave_bed_time, vec![1900]);
    assert_eq!(report.awake_long, 300);
    // 浅睡 1300-1600 加 5000-6000
    assert_eq!(report.sleep_light, 1300);
    // 深睡 1600 开始，无人记录在 1900 处关闭
    assert_eq!(report.sleep_deep, 300);
    assert_eq!(report.sleep_long, 1600);
}

#[test]
fn no_person_closes_without_opening() {
    let periods = [
        period(100, 2, 0, (100, 400)),
        period(200, 0, 0, (100, 400)),
        period(300, 0, 0, (100, 400)),
    ];
    let report = reduce_periods(&periods);
    assert_eq!(report.sleep_light, 100);
    assert_eq!(report.awake_long, 0);
    // 无人时段不产生任何片段
    assert_eq!(report.stages_sleep_time.len(), 1);
}
