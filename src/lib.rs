// ==========================================
// 仓库收货监督 - 核心库
// ==========================================
// 系统定位: 收货表单导出的袋号重建、异常诊断与时间窗口导出
// 流程: 加载 → 袋号字段提取 → 规范袋号 → 异常检测 / 时间窗口 → 导出映射
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 文件解析与袋号提取
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 导出层 - CSV / JSON 写出
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    DuplicateRow, EnrichedRecord, EnrichedTable, ExceptionRow, ExceptionViews, ExportRecord,
    PipelineReport, RawRecord, RawTable, RowIssue, RunSummary, TimeWindow, WindowRequest,
};

// 引擎
pub use engine::{
    ExceptionDetector, IdentityResolver, ReceivingPipeline, SchemaMapper, TimeWindowFilter,
};

// 导入
pub use importer::{FieldExtractor, ReceivingError, ReceivingLoader, ReceivingResult};

// 配置
pub use config::{ConfigManager, PipelineConfigReader, PipelineSettings};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库收货监督";
