use hms_report::{VitalsSample, bin_vitals};

fn sample(ts: i64, heart_rate: i32, breath_rate: i32, physical: i32) -> VitalsSample {
    VitalsSample {
        ts,
        heart_rate,
        breath_rate,
        physical,
    }
}

// 零样本输出全零与空窗口表，不是错误。
#[test]
fn empty_input_yields_zeroes() {
    let stats = bin_vitals(&[]);
    assert_eq!(stats.avg_heart_rate, 0);
    assert_eq!(stats.avg_breath_rate, 0);
    assert_eq!(stats.avg_physical, 0);
    assert_eq!(stats.max_heart_rate, 0);
    assert!(stats.windows.is_empty());
}

#[test]
fn averages_truncate_and_max_tracks() {
    let stats = bin_vitals(&[
        sample(0, 60, 14, 30),
        sample(60, 61, 15, 31),
        sample(120, 70, 16, 35),
    ]);
    // (60+61+70)/3 = 63（截断）
    assert_eq!(stats.avg_heart_rate, 63);
    assert_eq!(stats.avg_breath_rate, 15);
    assert_eq!(stats.avg_physical, 32);
    assert_eq!(stats.max_heart_rate, 70);
    assert_eq!(stats.max_breath_rate, 16);
    assert_eq!(stats.max_physical, 35);
}

// 与窗口首样本差满 30 分钟（diff > 29）即开新窗。
#[test]
fn exact_thirty_minute_gap_starts_new_window() {
    let stats = bin_vitals(&[sample(0, 60, 14, 30), sample(1800, 80, 18, 40)]);
    assert_eq!(stats.windows.len(), 2);
    assert_eq!(stats.windows[0].begin, 0);
    assert_eq!(stats.windows[0].heart_high, 60);
    assert_eq!(stats.windows[1].begin, 1800);
    assert_eq!(stats.windows[1].heart_high, 80);
}

#[test]
fn twenty_nine_minute_gap_stays_in_window() {
    let stats = bin_vitals(&[sample(0, 60, 14, 30), sample(1740, 80, 18, 40)]);
    assert_eq!(stats.windows.len(), 1);
    assert_eq!(stats.windows[0].heart_high, 80);
    assert_eq!(stats.windows[0].heart_low, 60);
}

#[test]
fn window_tracks_high_and_low_per_metric() {
    let stats = bin_vitals(&[
        sample(0, 60, 18, 30),
        sample(60, 75, 12, 45),
        sample(120, 55, 15, 20),
    ]);
    let window = &stats.windows[0];
    assert_eq!((window.heart_high, window.heart_low), (75, 55));
    assert_eq!((window.breath_high, window.breath_low), (18, 12));
    assert_eq!((window.physical_high, window.physical_low), (45, 20));
}
