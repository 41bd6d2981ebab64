// ==========================================
// 仓库收货监督 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 结构错误（致命）/ 行级错误（不中断）/ 文件与配置错误（致命）
// ==========================================

use thiserror::Error;

/// 收货流水线错误类型
#[derive(Error, Debug)]
pub enum ReceivingError {
    // ===== 结构错误（致命）=====
    #[error("缺少必需列: '{column}'")]
    SchemaError { column: String },

    // ===== 行级错误（不中断运行）=====
    #[error("袋号解析失败 (行 {row}): {message}")]
    ParseError { row: usize, message: String },

    #[error("时间格式错误 (行 {row}, 字段 {field}): 无法解析 {value}")]
    FormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作表不存在: {sheet}（可用: {available}）")]
    SheetNotFound { sheet: String, available: String },

    #[error("工作表无表头行: {sheet}（表头行索引 {header_row_index}）")]
    EmptySheet {
        sheet: String,
        header_row_index: usize,
    },

    #[error("导出写入失败: {0}")]
    ExportWriteError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("时间窗口无效: {0}")]
    InvalidTimeWindow(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReceivingError {
    /// 是否为行级错误（记录后继续运行）
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ReceivingError::ParseError { .. } | ReceivingError::FormatError { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ReceivingError {
    fn from(err: std::io::Error) -> Self {
        ReceivingError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ReceivingError {
    fn from(err: csv::Error) -> Self {
        ReceivingError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ReceivingError {
    fn from(err: calamine::Error) -> Self {
        ReceivingError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ReceivingError {
    fn from(err: serde_json::Error) -> Self {
        ReceivingError::ConfigReadError {
            key: "<json>".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ReceivingResult<T> = Result<T, ReceivingError>;
