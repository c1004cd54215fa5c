//! 睡眠分期归并。
//!
//! 将按时间有序的设备读数流归并为睡眠报告。两种输入形态：
//! - 逐样本流（心率类设备）：固定小间隔采样，按同阶段连续段累计时长
//! - 分期报告流（ed713/X1 类设备）：设备侧已分期，带事件码与会话边界
//!
//! 每个阶段类别（清醒/浅睡/深睡）各维护一个「当前打开区间」；
//! 读数的类别变化时关闭旧类别（累计时长、追加片段），再打开新类别。
//! 流结束时关闭仍打开的类别。时长为整秒，由时间戳相减得出；
//! 输入按时间非降序，归并不防御乱序。

use domain::SleepStage;

/// 一个阶段片段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSegment {
    pub stage: SleepStage,
    pub begin: i64,
    pub end: i64,
}

/// 一次睡眠会话。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepSession {
    pub begin: i64,
    pub end: i64,
}

/// 睡眠报告（按查询即时聚合，不持久化）。
#[derive(Debug, Clone, Default)]
pub struct SleepReport {
    pub start_time: i64,
    pub end_time: i64,
    pub sleep_num: u32,
    pub sleep_light: i64,
    pub sleep_deep: i64,
    pub sleep_long: i64,
    pub awake_long: i64,
    pub turn_over: u32,
    pub leave_bed_num: u32,
    pub leave_bed_time: Vec<i64>,
    pub sleep_time_list: Vec<SleepSession>,
    pub stages_sleep_time: Vec<StageSegment>,
}

/// 逐样本输入。
#[derive(Debug, Clone)]
pub struct StageSample {
    pub ts: i64,
    /// 1=清醒，2=浅睡，3=深睡
    pub stage_code: i16,
    pub turn_over: bool,
}

/// 分期报告输入。
#[derive(Debug, Clone)]
pub struct StagePeriod {
    pub ts: i64,
    /// 0=无人，1=清醒，2=浅睡，3=深睡
    pub periodization: i16,
    /// 0=无，1=翻身，2=离床
    pub event: i16,
    pub session_start: i64,
    pub session_end: i64,
}

const STAGES: [SleepStage; 3] = [SleepStage::Awake, SleepStage::Light, SleepStage::Deep];

#[derive(Debug, Clone, Copy, Default)]
struct OpenInterval {
    open: bool,
    opened_at: i64,
}

/// 每阶段一个打开区间的状态机。
#[derive(Debug, Default)]
struct StageTracker {
    intervals: [OpenInterval; 3],
    durations: [i64; 3],
    segments: Vec<StageSegment>,
}

fn stage_index(stage: SleepStage) -> usize {
    match stage {
        SleepStage::Awake => 0,
        SleepStage::Light => 1,
        SleepStage::Deep => 2,
    }
}

impl StageTracker {
    /// 处理一条处于 `stage` 的读数。
    fn observe(&mut self, stage: SleepStage, ts: i64) {
        for other in STAGES {
            if other != stage {
                self.close(other, ts);
            }
        }
        let interval = &mut self.intervals[stage_index(stage)];
        if !interval.open {
            interval.open = true;
            interval.opened_at = ts;
        }
    }

    /// 关闭一个阶段（若打开）：累计时长并追加片段。
    fn close(&mut self, stage: SleepStage, ts: i64) {
        let index = stage_index(stage);
        if !self.intervals[index].open {
            return;
        }
        let begin = self.intervals[index].opened_at;
        self.durations[index] += ts - begin;
        self.segments.push(StageSegment {
            stage,
            begin,
            end: ts,
        });
        self.intervals[index].open = false;
    }

    /// 流结束：关闭所有仍打开的阶段。
    fn close_all(&mut self, ts: i64) {
        for stage in STAGES {
            self.close(stage, ts);
        }
    }

    fn duration(&self, stage: SleepStage) -> i64 {
        self.durations[stage_index(stage)]
    }
}

/// 逐样本流归并。
///
/// 睡眠会话取浅睡/深睡的极大连续段；清醒样本结束当前会话。
pub fn reduce_samples(samples: &[StageSample]) -> SleepReport {
    let mut report = SleepReport::default();
    let Some(first) = samples.first() else {
        return report;
    };
    let last_ts = samples[samples.len() - 1].ts;
    report.start_time = first.ts;
    report.end_time = last_ts;

    let mut tracker = StageTracker::default();
    let mut session_begin: Option<i64> = None;
    for sample in samples {
        if sample.turn_over {
            report.turn_over += 1;
        }
        let Some(stage) = SleepStage::from_sample_code(sample.stage_code) else {
            continue;
        };
        match stage {
            SleepStage::Light | SleepStage::Deep => {
                if session_begin.is_none() {
                    session_begin = Some(sample.ts);
                }
            }
            SleepStage::Awake => {
                if let Some(begin) = session_begin.take() {
                    report.sleep_num += 1;
                    report.sleep_time_list.push(SleepSession {
                        begin,
                        end: sample.ts,
                    });
                }
            }
        }
        tracker.observe(stage, sample.ts);
    }
    tracker.close_all(last_ts);
    if let Some(begin) = session_begin {
        report.sleep_num += 1;
        report.sleep_time_list.push(SleepSession {
            begin,
            end: last_ts,
        });
    }

    report.sleep_light = tracker.duration(SleepStage::Light);
    report.sleep_deep = tracker.duration(SleepStage::Deep);
    report.sleep_long = report.sleep_light + report.sleep_deep;
    report.awake_long = clamped_awake(
        last_ts - first.ts,
        report.sleep_long,
        tracker.duration(SleepStage::Awake),
    );
    report.stages_sleep_time = tracker.segments;
    report
}

/// 逐样本形态的清醒时长上限修正。
///
/// 累计的睡眠+清醒超过首末样本的总跨度时，把清醒截断到剩余跨度。
pub fn clamped_awake(total_span: i64, sleep_long: i64, awake_long: i64) -> i64 {
    if sleep_long + awake_long > total_span {
        (total_span - sleep_long).max(0)
    } else {
        awake_long
    }
}

/// 分期报告流归并。
///
/// `session_start` 变化即视为新会话；无人（periodization=0）关闭
/// 所有打开阶段且不打开新阶段；流结束用声明的结束时间
/// （末条记录的 `session_end`，缺失时退回末条时间戳）关闭。
pub fn reduce_periods(periods: &[StagePeriod]) -> SleepReport {
    let mut report = SleepReport::default();
    let Some(first) = periods.first() else {
        return report;
    };
    let last = &periods[periods.len() - 1];
    let declared_end = if last.session_end > last.ts {
        last.session_end
    } else {
        last.ts
    };
    report.start_time = first.ts;
    report.end_time = declared_end;

    let mut tracker = StageTracker::default();
    let mut current_session: Option<i64> = None;
    for period in periods {
        if current_session != Some(period.session_start) {
            current_session = Some(period.session_start);
            report.sleep_num += 1;
            report.sleep_time_list.push(SleepSession {
                begin: period.session_start,
                end: period.session_end,
            });
        }
        match period.event {
            1 => report.turn_over += 1,
            2 => {
                report.leave_bed_num += 1;
                report.leave_bed_time.push(period.ts);
            }
            _ => {}
        }
        match SleepStage::from_period_code(period.periodization) {
            Some(stage) => tracker.observe(stage, period.ts),
            None => tracker.close_all(period.ts),
        }
    }
    tracker.close_all(declared_end);

    report.sleep_light = tracker.duration(SleepStage::Light);
    report.sleep_deep = tracker.duration(SleepStage::Deep);
    report.sleep_long = report.sleep_light + report.sleep_deep;
    report.awake_long = tracker.duration(SleepStage::Awake);
    report.stages_sleep_time = tracker.segments;
    report
}
