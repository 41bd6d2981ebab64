// ==========================================
// 仓库收货监督 - 配置层
// ==========================================
// 职责: 配置加载（JSON 文件 + 环境变量覆写），输出流水线参数快照
// ==========================================

pub mod config_manager;
pub mod pipeline_config_trait;
pub mod pipeline_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use pipeline_config_trait::PipelineConfigReader;
pub use pipeline_settings::PipelineSettings;
