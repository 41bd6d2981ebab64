// ==========================================
// 仓库收货监督 - 领域模型层
// ==========================================
// 职责: 定义收货记录、诊断视图、时间窗口等领域实体
// 红线: 不含文件读写逻辑，不含引擎逻辑
// ==========================================

pub mod record;
pub mod report;
pub mod types;
pub mod window;

// 重导出核心类型
pub use record::{
    format_timestamp, EnrichedRecord, EnrichedTable, ParsedIdentifierFields, RawRecord, RawTable,
};
pub use report::{
    DuplicateRow, ExceptionRow, ExceptionViews, ExportRecord, PipelineReport, RowIssue,
    RunSummary, EXPORT_COLUMNS,
};
pub use types::{columns, ExceptionKind, IssueLevel, TIMESTAMP_TEXT_FORMAT};
pub use window::{TimeWindow, WindowRequest};
