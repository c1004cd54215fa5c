//! 按设备族的数据源分发。
//!
//! 每个设备族对应一种查询-归并实现，按 DeviceKind 一次性选取，
//! 不在各入口重复按字符串分支。

use crate::stages::{
    SleepReport, StagePeriod, StageSample, reduce_periods, reduce_samples,
};
use crate::vitals::{VitalsSample, VitalsStats, bin_vitals};
use async_trait::async_trait;
use domain::DeviceKind;
use hms_storage::{DeviceRecord, SleepDataStore, StorageError, VitalsStore};
use hms_telemetry::{
    record_report_latency_ms, record_sleep_report_built, record_vitals_report_built,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// 报告构建错误。
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("device kind {0} has no report source")]
    Unsupported(String),
}

impl From<StorageError> for ReportError {
    fn from(err: StorageError) -> Self {
        ReportError::Storage(err.to_string())
    }
}

/// 设备族睡眠数据源抽象。
#[async_trait]
pub trait VitalsSource: Send + Sync {
    async fn sleep_report(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<SleepReport, ReportError>;
}

/// 逐样本流数据源（心率/跌倒检测族）。
pub struct SampleStreamSource {
    sleep_data: Arc<dyn SleepDataStore>,
}

impl SampleStreamSource {
    pub fn new(sleep_data: Arc<dyn SleepDataStore>) -> Self {
        Self { sleep_data }
    }
}

#[async_trait]
impl VitalsSource for SampleStreamSource {
    async fn sleep_report(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<SleepReport, ReportError> {
        let records = self.sleep_data.list_samples(device_id, start, end).await?;
        let samples: Vec<StageSample> = records
            .into_iter()
            .map(|record| StageSample {
                ts: record.ts,
                stage_code: record.stage,
                turn_over: record.turn_over,
            })
            .collect();
        Ok(reduce_samples(&samples))
    }
}

/// 分期报告流数据源（ed713/X1/X1S/H03/T1 族）。
pub struct PeriodizedSource {
    sleep_data: Arc<dyn SleepDataStore>,
}

impl PeriodizedSource {
    pub fn new(sleep_data: Arc<dyn SleepDataStore>) -> Self {
        Self { sleep_data }
    }
}

#[async_trait]
impl VitalsSource for PeriodizedSource {
    async fn sleep_report(
        &self,
        device_id: &str,
        start: i64,
        end: i64,
    ) -> Result<SleepReport, ReportError> {
        let records = self.sleep_data.list_periods(device_id, start, end).await?;
        let periods: Vec<StagePeriod> = records
            .into_iter()
            .map(|record| StagePeriod {
                ts: record.ts,
                periodization: record.periodization,
                event: record.event,
                session_start: record.session_start,
                session_end: record.session_end,
            })
            .collect();
        Ok(reduce_periods(&periods))
    }
}

/// 设备族 → 数据源注册表。
pub struct SourceRegistry {
    sample_stream: Arc<dyn VitalsSource>,
    periodized: Arc<dyn VitalsSource>,
}

impl SourceRegistry {
    pub fn new(sleep_data: Arc<dyn SleepDataStore>) -> Self {
        Self {
            sample_stream: Arc::new(SampleStreamSource::new(sleep_data.clone())),
            periodized: Arc::new(PeriodizedSource::new(sleep_data)),
        }
    }

    /// 按设备族选取数据源；灯具类设备无睡眠数据源。
    pub fn for_kind(&self, kind: DeviceKind) -> Option<Arc<dyn VitalsSource>> {
        match kind {
            DeviceKind::HeartRate | DeviceKind::FallCheck => Some(self.sample_stream.clone()),
            DeviceKind::Ed713
            | DeviceKind::X1
            | DeviceKind::X1s
            | DeviceKind::H03
            | DeviceKind::T1 => Some(self.periodized.clone()),
            DeviceKind::Lamp => None,
        }
    }
}

/// 报告服务：数据源分发 + 体征分箱 + 指标上报。
pub struct ReportService {
    registry: SourceRegistry,
    vitals: Arc<dyn VitalsStore>,
}

impl ReportService {
    pub fn new(sleep_data: Arc<dyn SleepDataStore>, vitals: Arc<dyn VitalsStore>) -> Self {
        Self {
            registry: SourceRegistry::new(sleep_data),
            vitals,
        }
    }

    /// 构建设备的睡眠报告。
    pub async fn sleep_report(
        &self,
        device: &DeviceRecord,
        start: i64,
        end: i64,
    ) -> Result<SleepReport, ReportError> {
        let source = self
            .registry
            .for_kind(device.kind)
            .ok_or_else(|| ReportError::Unsupported(device.kind.to_string()))?;
        let started_at = Instant::now();
        let report = source.sleep_report(&device.device_id, start, end).await?;
        record_sleep_report_built();
        record_report_latency_ms(started_at.elapsed().as_millis() as u64);
        debug!(
            target: "hms.report",
            device_id = %device.device_id,
            kind = %device.kind,
            sleep_num = report.sleep_num,
            sleep_long = report.sleep_long,
            "sleep_report_built"
        );
        Ok(report)
    }

    /// 构建设备的体征分箱统计。
    pub async fn vitals_stats(
        &self,
        device: &DeviceRecord,
        start: i64,
        end: i64,
    ) -> Result<VitalsStats, ReportError> {
        let records = self
            .vitals
            .list_samples(&device.device_id, start, end)
            .await?;
        let samples: Vec<VitalsSample> = records
            .into_iter()
            .map(|record| VitalsSample {
                ts: record.ts,
                heart_rate: record.heart_rate,
                breath_rate: record.breath_rate,
                physical: record.physical,
            })
            .collect();
        let stats = bin_vitals(&samples);
        record_vitals_report_built();
        Ok(stats)
    }
}
