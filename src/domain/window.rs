// ==========================================
// 仓库收货监督 - 时间窗口
// ==========================================
// 职责: 操作员提交的窗口参数 + 解析后的显示时区窗口
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// ==========================================
// WindowRequest - 窗口参数（外壳传入）
// ==========================================
// 四个参数均可缺省，缺省值在解析阶段按表数据与当前时间补齐
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRequest {
    pub start_date: Option<NaiveDate>, // 缺省: 最早 Added Time 所在日期
    pub start_time: Option<NaiveTime>, // 缺省: 00:00
    pub end_date: Option<NaiveDate>,   // 缺省: 当前日期（显示时区）
    pub end_time: Option<NaiveTime>,   // 缺省: 当前时刻（显示时区）
}

impl WindowRequest {
    pub fn new(
        start_date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_date: Option<NaiveDate>,
        end_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            start_date,
            start_time,
            end_date,
            end_time,
        }
    }
}

// ==========================================
// TimeWindow - 已解析的闭区间 [start, end]
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    /// 导出文件名
    ///
    /// # 格式
    /// From_{YYYYMMDD}_{HHMM}_to_{YYYYMMDD}_{HHMM}_Receiving.csv
    pub fn export_file_name(&self) -> String {
        format!(
            "From_{}_to_{}_Receiving.csv",
            self.start.format("%Y%m%d_%H%M"),
            self.end.format("%Y%m%d_%H%M")
        )
    }

    /// 起点晚于终点（不含任何时刻）
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// 区间文本（日志 / 汇总使用）
    pub fn start_text(&self) -> String {
        self.start.format("%Y-%m-%d %H:%M:%S %:z").to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format("%Y-%m-%d %H:%M:%S %:z").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Africa::Lusaka;

    #[test]
    fn test_export_file_name() {
        let window = TimeWindow {
            start: Lusaka.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Lusaka.with_ymd_and_hms(2024, 1, 2, 17, 45, 30).unwrap(),
        };

        assert_eq!(
            window.export_file_name(),
            "From_20240101_0000_to_20240102_1745_Receiving.csv"
        );
        assert_eq!(window.start_text(), "2024-01-01 00:00:00 +02:00");
    }
}
