// ==========================================
// 仓库收货监督 - 导入层
// ==========================================
// 职责: 读取收货表单导出，解析复合袋号，生成富化表
// 支持: Excel (.xlsx/.xlsm/.xls/.ods), CSV
// ==========================================

// 模块声明
pub mod bag_id_parser;
pub mod data_cleaner;
pub mod error;
pub mod field_extractor;
pub mod file_parser;
pub mod receiving_importer_trait;
pub mod receiving_loader;

// 重导出核心类型
pub use bag_id_parser::{BagIdParser, Segment};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ReceivingError, ReceivingResult};
pub use field_extractor::{ExtractionOutcome, FieldExtractor};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use receiving_loader::{LoadOutcome, ReceivingLoader};

// 重导出 Trait 接口
pub use receiving_importer_trait::{
    DataCleaner, FileParser, IdentifierParser, RawSheet, SheetLayout, SheetRow,
};
