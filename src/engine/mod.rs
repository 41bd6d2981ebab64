// ==========================================
// 仓库收货监督 - 引擎层
// ==========================================
// 职责: 规范袋号、异常检测、时间窗口、导出映射与流水线编排
// 红线: 引擎不做文件读写，只处理内存中的收货表
// ==========================================

pub mod exception_detector;
pub mod identity_resolver;
pub mod orchestrator;
pub mod schema_mapper;
pub mod time_window;

// 重导出核心引擎
pub use exception_detector::{consolidate, ExceptionDetector};
pub use identity_resolver::{canonical_id, IdentityResolver, DEFAULT_SCAN_LENGTH_THRESHOLD};
pub use orchestrator::ReceivingPipeline;
pub use schema_mapper::{SchemaMapper, EXPORT_COLUMN_MAPPING, OFFSET_SUFFIXED_COLUMNS};
pub use time_window::TimeWindowFilter;
