// ==========================================
// 仓库收货监督 - 时间窗口过滤
// ==========================================
// 规则: 窗口边界在显示时区解析；存储时间戳按存储时区解释后换算
//       start <= ts <= end 保留；空时间戳一律排除
// 红线: 只读过滤，不修改存储值
// ==========================================

use crate::domain::{EnrichedRecord, EnrichedTable, TimeWindow, WindowRequest};
use crate::importer::error::{ReceivingError, ReceivingResult};
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindowFilter {
    display_tz: Tz,
    storage_tz: Tz,
}

impl Default for TimeWindowFilter {
    fn default() -> Self {
        Self::new(chrono_tz::Africa::Lusaka, chrono_tz::UTC)
    }
}

impl TimeWindowFilter {
    pub fn new(display_tz: Tz, storage_tz: Tz) -> Self {
        Self {
            display_tz,
            storage_tz,
        }
    }

    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }

    /// 补齐缺省参数并解析窗口
    ///
    /// # 缺省
    /// - start_date: 最早时间戳在显示时区的日期（无时间戳则为今天）
    /// - start_time: 00:00
    /// - end_date / end_time: now 在显示时区的日期 / 时刻
    ///
    /// # 返回
    /// - Ok: 起点晚于终点时照常返回（`is_empty()` 为真，过滤结果为空）
    /// - Err(InvalidTimeWindow): 本地时刻不存在（夏令时跳变）
    pub fn resolve(
        &self,
        request: &WindowRequest,
        earliest: Option<NaiveDateTime>,
        now: DateTime<Utc>,
    ) -> ReceivingResult<TimeWindow> {
        let now_local = now.with_timezone(&self.display_tz);

        let start_date = request
            .start_date
            .or_else(|| earliest.and_then(|ts| self.localize(ts)).map(|dt| dt.date_naive()))
            .unwrap_or_else(|| now_local.date_naive());
        let start_time = request.start_time.unwrap_or(NaiveTime::MIN);
        let end_date = request.end_date.unwrap_or_else(|| now_local.date_naive());
        let end_time = request.end_time.unwrap_or_else(|| now_local.time());

        let window = TimeWindow {
            start: self.display_datetime(start_date.and_time(start_time))?,
            end: self.display_datetime(end_date.and_time(end_time))?,
        };

        if window.is_empty() {
            warn!(
                start = %window.start_text(),
                end = %window.end_text(),
                "时间窗口起点晚于终点，导出为空"
            );
        }

        debug!(start = %window.start_text(), end = %window.end_text(), "时间窗口已解析");
        Ok(window)
    }

    /// 存储时间戳 → 显示时区
    pub fn localize(&self, stored: NaiveDateTime) -> Option<DateTime<Tz>> {
        self.storage_tz
            .from_local_datetime(&stored)
            .earliest()
            .map(|dt| dt.with_timezone(&self.display_tz))
    }

    pub fn contains(&self, window: &TimeWindow, stored: Option<NaiveDateTime>) -> bool {
        stored
            .and_then(|ts| self.localize(ts))
            .is_some_and(|local| window.start <= local && local <= window.end)
    }

    /// 过滤富化表（保持表内顺序）
    pub fn filter<'a>(&self, table: &'a EnrichedTable, window: &TimeWindow) -> Vec<&'a EnrichedRecord> {
        let kept: Vec<&EnrichedRecord> = table
            .records
            .iter()
            .filter(|record| self.contains(window, record.added_time()))
            .collect();

        info!(
            total = table.len(),
            kept = kept.len(),
            start = %window.start_text(),
            end = %window.end_text(),
            "时间窗口过滤完成"
        );
        kept
    }

    fn display_datetime(&self, local: NaiveDateTime) -> ReceivingResult<DateTime<Tz>> {
        self.display_tz
            .from_local_datetime(&local)
            .earliest()
            .ok_or_else(|| {
                ReceivingError::InvalidTimeWindow(format!(
                    "{} 在时区 {} 中不存在",
                    local, self.display_tz
                ))
            })
    }
}
