// ==========================================
// 仓库收货监督 - 诊断视图与运行报告
// ==========================================
// 职责: 重复袋号合并行 / 异常投影行 / 导出行 / 行级问题 / 运行汇总
// ==========================================

use crate::domain::record::{EnrichedRecord, EnrichedTable};
use crate::domain::types::{columns, IssueLevel};
use crate::domain::window::TimeWindow;
use serde::{Deserialize, Serialize};

// ==========================================
// DuplicateRow - 重复袋号合并行
// ==========================================
// 字段序即诊断 CSV 列序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRow {
    #[serde(rename = "Added Time")]
    pub added_times: Option<String>, // 去重后降序、", " 连接
    #[serde(rename = "Bag Scanned & Manual")]
    pub canonical_id: String,
    #[serde(rename = "KICO SEAL NO.")]
    pub kico_seal: Option<String>,
    #[serde(rename = "MMS BAG SEAL NO")]
    pub mms_seal: Option<String>,
    #[serde(rename = "Seal")]
    pub seal: Option<String>,
    #[serde(rename = "Lot")]
    pub lot: Option<String>,
    #[serde(rename = "RECEIVING HORSE REGISTRATION")]
    pub horse_registration: Option<String>,
}

impl DuplicateRow {
    pub const COLUMNS: [&'static str; 7] = [
        columns::ADDED_TIME,
        columns::CANONICAL_ID,
        columns::KICO_SEAL,
        columns::MMS_SEAL,
        columns::SEAL,
        columns::LOT,
        columns::HORSE_REGISTRATION,
    ];
}

// ==========================================
// ExceptionRow - 长度 / 短横线 / 未解析视图的投影行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRow {
    #[serde(rename = "Added Time")]
    pub added_time: Option<String>,
    #[serde(rename = "BAG ID.")]
    pub bag_id: Option<String>,
    #[serde(rename = "Bag Scanned & Manual")]
    pub canonical_id: Option<String>,
    #[serde(rename = "KICO SEAL NO.")]
    pub kico_seal: Option<String>,
    #[serde(rename = "MMS BAG SEAL NO")]
    pub mms_seal: Option<String>,
    #[serde(rename = "Seal")]
    pub seal: Option<String>,
    #[serde(rename = "Lot")]
    pub lot: Option<String>,
    #[serde(rename = "RECEIVING HORSE REGISTRATION")]
    pub horse_registration: Option<String>,
    #[serde(skip)]
    pub row_number: usize,
}

impl ExceptionRow {
    pub const COLUMNS: [&'static str; 8] = [
        columns::ADDED_TIME,
        columns::BAG_ID,
        columns::CANONICAL_ID,
        columns::KICO_SEAL,
        columns::MMS_SEAL,
        columns::SEAL,
        columns::LOT,
        columns::HORSE_REGISTRATION,
    ];

    pub fn from_record(record: &EnrichedRecord) -> Self {
        Self {
            added_time: record.display_value(columns::ADDED_TIME),
            bag_id: record.display_value(columns::BAG_ID),
            canonical_id: record.display_value(columns::CANONICAL_ID),
            kico_seal: record.display_value(columns::KICO_SEAL),
            mms_seal: record.display_value(columns::MMS_SEAL),
            seal: record.display_value(columns::SEAL),
            lot: record.display_value(columns::LOT),
            horse_registration: record.display_value(columns::HORSE_REGISTRATION),
            row_number: record.row_number(),
        }
    }
}

// ==========================================
// ExportRecord - 外部系统导出行
// ==========================================
pub const EXPORT_COLUMNS: [&str; 10] = [
    "name",
    "GRN_KICO_SEAL",
    "MMS_SEAL_NO",
    "GRN_WH_GROSS_WEIGHT",
    "GRN_RECEIVED_DATE",
    "ZAM_GRN_BAG_CONDITION_STATUS",
    "GRN_WAREHOUSE_NAME",
    "GRN_TRUCK_REG",
    "WITNESS_GRN_USER",
    "GRN_FORM_COMPLETE",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub name: Option<String>,
    #[serde(rename = "GRN_KICO_SEAL")]
    pub grn_kico_seal: Option<String>,
    #[serde(rename = "MMS_SEAL_NO")]
    pub mms_seal_no: Option<String>,
    #[serde(rename = "GRN_WH_GROSS_WEIGHT")]
    pub grn_wh_gross_weight: Option<String>,
    #[serde(rename = "GRN_RECEIVED_DATE")]
    pub grn_received_date: Option<String>,
    #[serde(rename = "ZAM_GRN_BAG_CONDITION_STATUS")]
    pub zam_grn_bag_condition_status: Option<String>,
    #[serde(rename = "GRN_WAREHOUSE_NAME")]
    pub grn_warehouse_name: Option<String>,
    #[serde(rename = "GRN_TRUCK_REG")]
    pub grn_truck_reg: Option<String>,
    #[serde(rename = "WITNESS_GRN_USER")]
    pub witness_grn_user: Option<String>,
    #[serde(rename = "GRN_FORM_COMPLETE")]
    pub grn_form_complete: Option<String>,
}

impl ExportRecord {
    /// 按外部列名取可变槽位
    pub fn slot_mut(&mut self, external_column: &str) -> Option<&mut Option<String>> {
        match external_column {
            "name" => Some(&mut self.name),
            "GRN_KICO_SEAL" => Some(&mut self.grn_kico_seal),
            "MMS_SEAL_NO" => Some(&mut self.mms_seal_no),
            "GRN_WH_GROSS_WEIGHT" => Some(&mut self.grn_wh_gross_weight),
            "GRN_RECEIVED_DATE" => Some(&mut self.grn_received_date),
            "ZAM_GRN_BAG_CONDITION_STATUS" => Some(&mut self.zam_grn_bag_condition_status),
            "GRN_WAREHOUSE_NAME" => Some(&mut self.grn_warehouse_name),
            "GRN_TRUCK_REG" => Some(&mut self.grn_truck_reg),
            "WITNESS_GRN_USER" => Some(&mut self.witness_grn_user),
            "GRN_FORM_COMPLETE" => Some(&mut self.grn_form_complete),
            _ => None,
        }
    }

    /// 按 EXPORT_COLUMNS 顺序输出
    pub fn values(&self) -> [Option<&str>; 10] {
        [
            self.name.as_deref(),
            self.grn_kico_seal.as_deref(),
            self.mms_seal_no.as_deref(),
            self.grn_wh_gross_weight.as_deref(),
            self.grn_received_date.as_deref(),
            self.zam_grn_bag_condition_status.as_deref(),
            self.grn_warehouse_name.as_deref(),
            self.grn_truck_reg.as_deref(),
            self.witness_grn_user.as_deref(),
            self.grn_form_complete.as_deref(),
        ]
    }
}

// ==========================================
// RowIssue - 行级问题（ParseError / FormatError）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    pub row_number: usize,       // 原始文件行号
    pub bag_id: Option<String>,  // 原始袋号（如有）
    pub level: IssueLevel,
    pub field: String,           // 问题字段
    pub message: String,
}

impl RowIssue {
    pub fn warning(
        row_number: usize,
        bag_id: Option<&str>,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            bag_id: bag_id.map(str::to_string),
            level: IssueLevel::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// ExceptionViews - 四个互相独立的诊断视图
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExceptionViews {
    pub duplicates: Vec<DuplicateRow>,
    pub length_exceptions: Vec<ExceptionRow>,
    pub dash_exceptions: Vec<ExceptionRow>,
    pub unresolved_identities: Vec<ExceptionRow>,
}

// ==========================================
// RunSummary - 运行汇总（summary.json）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub source_file: Option<String>,
    pub combined_rows: usize,
    pub duplicate_groups: usize,
    pub length_exceptions: usize,
    pub dash_exceptions: usize,
    pub unresolved_identities: usize,
    pub parse_issues: usize,
    pub format_issues: usize,
    pub filtered_rows: usize,
    pub window_start: String,
    pub window_end: String,
    pub export_file_name: String,
    pub elapsed_ms: u128,
    pub issues: Vec<RowIssue>,
}

// ==========================================
// PipelineReport - 单次运行的全部输出
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub combined: EnrichedTable,
    pub exceptions: ExceptionViews,
    pub issues: Vec<RowIssue>,
    pub window: TimeWindow,
    pub export: Vec<ExportRecord>,
    pub summary: RunSummary,
}
