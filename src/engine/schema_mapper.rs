// ==========================================
// 仓库收货监督 - 导出字段映射
// ==========================================
// 规则: 固定 10 列（名称与顺序不随输入变化），缺失源列置空
//       两个时间列的非空值追加固定偏移后缀
// ==========================================

use crate::domain::{columns, EnrichedRecord, ExportRecord};
use tracing::debug;

/// 外部列 → 源列（顺序即导出列序）
pub const EXPORT_COLUMN_MAPPING: [(&str, &str); 10] = [
    ("name", columns::CANONICAL_ID),
    ("GRN_KICO_SEAL", columns::KICO_SEAL),
    ("MMS_SEAL_NO", columns::MMS_SEAL),
    ("GRN_WH_GROSS_WEIGHT", columns::GROSS_WEIGHT),
    ("GRN_RECEIVED_DATE", columns::OFFLOADING_TIME),
    ("ZAM_GRN_BAG_CONDITION_STATUS", columns::BAG_CONDITION),
    ("GRN_WAREHOUSE_NAME", columns::WAREHOUSE),
    ("GRN_TRUCK_REG", columns::HORSE_REGISTRATION),
    ("WITNESS_GRN_USER", columns::ADDED_EMAIL),
    ("GRN_FORM_COMPLETE", columns::ADDED_TIME),
];

/// 需追加偏移后缀的时间列
pub const OFFSET_SUFFIXED_COLUMNS: [&str; 2] = ["GRN_FORM_COMPLETE", "GRN_RECEIVED_DATE"];

pub const DEFAULT_OFFSET_SUFFIX: &str = "+02:00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMapper {
    offset_suffix: String,
}

impl Default for SchemaMapper {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET_SUFFIX)
    }
}

impl SchemaMapper {
    pub fn new(offset_suffix: impl Into<String>) -> Self {
        Self {
            offset_suffix: offset_suffix.into(),
        }
    }

    pub fn map_record(&self, record: &EnrichedRecord) -> ExportRecord {
        let mut export = ExportRecord::default();
        for (external, source) in EXPORT_COLUMN_MAPPING {
            let mut value = record.display_value(source);
            if OFFSET_SUFFIXED_COLUMNS.contains(&external) {
                value = value.map(|text| format!("{}{}", text, self.offset_suffix));
            }
            if let Some(slot) = export.slot_mut(external) {
                *slot = value;
            }
        }
        export
    }

    pub fn map_records<'a, I>(&self, records: I) -> Vec<ExportRecord>
    where
        I: IntoIterator<Item = &'a EnrichedRecord>,
    {
        let mapped: Vec<ExportRecord> = records.into_iter().map(|r| self.map_record(r)).collect();
        debug!(rows = mapped.len(), "导出字段映射完成");
        mapped
    }
}
