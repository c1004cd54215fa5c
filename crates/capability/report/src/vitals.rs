//! 体征分箱统计。
//!
//! 对有序体征样本计算全程平均值（整除截断）与最大值，并按半小时
//! 窗口输出各指标的高低值序列。窗口边界规则：当前样本距窗口首样本
//! 超过 29 分钟（`diff_minutes > 29`）即关闭窗口并以当前样本开新窗。
//! 空输入输出全零与空窗口表，不是错误。

/// 体征样本输入。
#[derive(Debug, Clone)]
pub struct VitalsSample {
    pub ts: i64,
    pub heart_rate: i32,
    pub breath_rate: i32,
    pub physical: i32,
}

/// 单个半小时窗口的高低值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VitalsWindow {
    /// 窗口首样本时间戳
    pub begin: i64,
    pub heart_high: i32,
    pub heart_low: i32,
    pub breath_high: i32,
    pub breath_low: i32,
    pub physical_high: i32,
    pub physical_low: i32,
}

/// 分箱统计结果。
#[derive(Debug, Clone, Default)]
pub struct VitalsStats {
    pub avg_heart_rate: i64,
    pub avg_breath_rate: i64,
    pub avg_physical: i64,
    pub max_heart_rate: i32,
    pub max_breath_rate: i32,
    pub max_physical: i32,
    pub windows: Vec<VitalsWindow>,
}

impl VitalsWindow {
    fn seeded(sample: &VitalsSample) -> Self {
        Self {
            begin: sample.ts,
            heart_high: sample.heart_rate,
            heart_low: sample.heart_rate,
            breath_high: sample.breath_rate,
            breath_low: sample.breath_rate,
            physical_high: sample.physical,
            physical_low: sample.physical,
        }
    }

    fn absorb(&mut self, sample: &VitalsSample) {
        self.heart_high = self.heart_high.max(sample.heart_rate);
        self.heart_low = self.heart_low.min(sample.heart_rate);
        self.breath_high = self.breath_high.max(sample.breath_rate);
        self.breath_low = self.breath_low.min(sample.breath_rate);
        self.physical_high = self.physical_high.max(sample.physical);
        self.physical_low = self.physical_low.min(sample.physical);
    }
}

/// 体征样本分箱统计。
pub fn bin_vitals(samples: &[VitalsSample]) -> VitalsStats {
    let mut stats = VitalsStats::default();
    let Some(first) = samples.first() else {
        return stats;
    };

    let mut heart_sum: i64 = 0;
    let mut breath_sum: i64 = 0;
    let mut physical_sum: i64 = 0;
    let mut window = VitalsWindow::seeded(first);
    for sample in samples {
        heart_sum += i64::from(sample.heart_rate);
        breath_sum += i64::from(sample.breath_rate);
        physical_sum += i64::from(sample.physical);
        stats.max_heart_rate = stats.max_heart_rate.max(sample.heart_rate);
        stats.max_breath_rate = stats.max_breath_rate.max(sample.breath_rate);
        stats.max_physical = stats.max_physical.max(sample.physical);

        let diff_minutes = (sample.ts - window.begin) / 60;
        if diff_minutes > 29 {
            stats.windows.push(window);
            window = VitalsWindow::seeded(sample);
        } else {
            window.absorb(sample);
        }
    }
    stats.windows.push(window);

    let count = samples.len() as i64;
    stats.avg_heart_rate = heart_sum / count;
    stats.avg_breath_rate = breath_sum / count;
    stats.avg_physical = physical_sum / count;
    stats
}
