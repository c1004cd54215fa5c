/// 睡眠阶段，任一时刻互斥。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
}

impl SleepStage {
    /// 逐样本数据的 `stages_status` 编码：1=清醒，2=浅睡，3=深睡。
    pub fn from_sample_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(SleepStage::Awake),
            2 => Some(SleepStage::Light),
            3 => Some(SleepStage::Deep),
            _ => None,
        }
    }

    /// 分期报告数据的 `sleep_periodization` 编码：0=无人，1=清醒，2=浅睡，3=深睡。
    /// 无人（0）不属于任何阶段，返回 None。
    pub fn from_period_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(SleepStage::Awake),
            2 => Some(SleepStage::Light),
            3 => Some(SleepStage::Deep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStage::Awake => "awake",
            SleepStage::Light => "light",
            SleepStage::Deep => "deep",
        }
    }
}

impl std::fmt::Display for SleepStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
