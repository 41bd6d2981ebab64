// ==========================================
// 仓库收货监督 - 异常检测引擎
// ==========================================
// 视图: 重复袋号（合并）/ 长度区间 / 短横线 / 未解析袋号
// 红线: 各视图互相独立、可重叠，均按 Added Time 降序（空值置后）
// ==========================================

use crate::domain::{
    columns, format_timestamp, DuplicateRow, EnrichedRecord, EnrichedTable, ExceptionRow,
    ExceptionViews,
};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{info, instrument};

pub const DEFAULT_LENGTH_BAND: RangeInclusive<usize> = 16..=25;
pub const DEFAULT_DASH_MARKER: &str = "-";

/// 合并多行同列取值
///
/// # 规则
/// - 丢弃空值，按出现顺序去重（区分大小写）
/// - 0 个 → None；1 个 → 该值；多个 → ", " 连接
pub fn consolidate<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut distinct: Vec<&str> = Vec::new();
    for value in values.into_iter().flatten() {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }

    match distinct.len() {
        0 => None,
        _ => Some(distinct.join(", ")),
    }
}

// ==========================================
// ExceptionDetector
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionDetector {
    length_band: RangeInclusive<usize>,
    dash_marker: String,
    scan_length_threshold: usize,
}

impl Default for ExceptionDetector {
    fn default() -> Self {
        Self::new(
            DEFAULT_LENGTH_BAND,
            DEFAULT_DASH_MARKER,
            crate::engine::identity_resolver::DEFAULT_SCAN_LENGTH_THRESHOLD,
        )
    }
}

impl ExceptionDetector {
    pub fn new(
        length_band: RangeInclusive<usize>,
        dash_marker: impl Into<String>,
        scan_length_threshold: usize,
    ) -> Self {
        Self {
            length_band,
            dash_marker: dash_marker.into(),
            scan_length_threshold,
        }
    }

    /// 计算全部诊断视图
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn detect(&self, table: &EnrichedTable) -> ExceptionViews {
        let ordered = Self::ordered(table);

        let views = ExceptionViews {
            duplicates: self.duplicates(&ordered),
            length_exceptions: self.length_exceptions(&ordered),
            dash_exceptions: self.dash_exceptions(&ordered),
            unresolved_identities: self.unresolved_identities(&ordered),
        };

        info!(
            duplicate_groups = views.duplicates.len(),
            length_exceptions = views.length_exceptions.len(),
            dash_exceptions = views.dash_exceptions.len(),
            unresolved_identities = views.unresolved_identities.len(),
            "异常检测完成"
        );
        views
    }

    /// 重复袋号合并视图
    ///
    /// 输入须已按 Added Time 降序；分组顺序即各组最新时间降序
    pub fn duplicates(&self, ordered: &[&EnrichedRecord]) -> Vec<DuplicateRow> {
        let mut group_index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&EnrichedRecord>)> = Vec::new();

        for &record in ordered {
            let Some(id) = record.canonical_id.as_deref() else {
                continue;
            };
            match group_index.get(id) {
                Some(&idx) => groups[idx].1.push(record),
                None => {
                    group_index.insert(id, groups.len());
                    groups.push((id, vec![record]));
                }
            }
        }

        groups
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .map(|(id, members)| Self::consolidate_group(id, &members))
            .collect()
    }

    fn consolidate_group(canonical_id: &str, members: &[&EnrichedRecord]) -> DuplicateRow {
        let mut times: Vec<_> = members.iter().filter_map(|r| r.added_time()).collect();
        times.sort_by(|a, b| b.cmp(a));
        let time_texts: Vec<String> = times.iter().map(format_timestamp).collect();

        let reduce = |column: &str| consolidate(members.iter().map(|r| r.field(column)));

        DuplicateRow {
            added_times: consolidate(time_texts.iter().map(|t| Some(t.as_str()))),
            canonical_id: canonical_id.to_string(),
            kico_seal: reduce(columns::KICO_SEAL),
            mms_seal: reduce(columns::MMS_SEAL),
            seal: reduce(columns::SEAL),
            lot: reduce(columns::LOT),
            horse_registration: reduce(columns::HORSE_REGISTRATION),
        }
    }

    /// 原始袋号长度（字符数）落在区间内
    pub fn length_exceptions(&self, ordered: &[&EnrichedRecord]) -> Vec<ExceptionRow> {
        Self::project(ordered, |record| {
            record
                .bag_id()
                .is_some_and(|raw| self.length_band.contains(&raw.chars().count()))
        })
    }

    /// 规范袋号含短横线
    pub fn dash_exceptions(&self, ordered: &[&EnrichedRecord]) -> Vec<ExceptionRow> {
        Self::project(ordered, |record| {
            record
                .canonical_id
                .as_deref()
                .is_some_and(|id| id.contains(self.dash_marker.as_str()))
        })
    }

    /// 长袋号缺少 Bag 子字段，规范袋号为空
    pub fn unresolved_identities(&self, ordered: &[&EnrichedRecord]) -> Vec<ExceptionRow> {
        Self::project(ordered, |record| {
            record.canonical_id.is_none()
                && record
                    .bag_id()
                    .is_some_and(|raw| raw.chars().count() > self.scan_length_threshold)
        })
    }

    fn project<F>(ordered: &[&EnrichedRecord], predicate: F) -> Vec<ExceptionRow>
    where
        F: Fn(&EnrichedRecord) -> bool,
    {
        ordered
            .iter()
            .filter(|record| predicate(record))
            .map(|record| ExceptionRow::from_record(record))
            .collect()
    }

    /// Added Time 降序（稳定，空值置后）
    pub fn ordered(table: &EnrichedTable) -> Vec<&EnrichedRecord> {
        let mut ordered: Vec<&EnrichedRecord> = table.records.iter().collect();
        ordered.sort_by(|a, b| b.added_time().cmp(&a.added_time()));
        ordered
    }
}
