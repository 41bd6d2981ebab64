// ==========================================
// 仓库收货监督 - 导入接口 Trait
// ==========================================
// 职责: 定义加载与袋号解析的接口（不包含实现）
// ==========================================

use crate::domain::ParsedIdentifierFields;
use crate::importer::error::ReceivingResult;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// SheetLayout - 工作表布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub sheet_name: String,      // 目标工作表名（默认 RawData）
    pub header_row_index: usize, // 表头所在物理行（0 起；默认 1，即第二行）
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: "RawData".to_string(),
            header_row_index: 1,
        }
    }
}

// ==========================================
// SheetRow / RawSheet - 解析器输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub row_number: usize,               // 物理行号（1 起）
    pub values: HashMap<String, String>, // 列名 → 单元格文本（已 TRIM）
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 行记录
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - layout: 工作表名与表头行
    ///
    /// # 返回
    /// - Ok(RawSheet): 表头与数据行（已跳过全空行）
    /// - Err: 文件不存在、格式不支持、工作表缺失
    fn parse_to_raw_records(&self, file_path: &Path, layout: &SheetLayout)
        -> ReceivingResult<RawSheet>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗与时间戳解析接口（阶段 1）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白/NaN 占位 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 宽松解析时间戳
    ///
    /// # 返回
    /// - Some(NaiveDateTime): 解析成功（带时区偏移的输入换算为 UTC）
    /// - None: 无法解析（调用方记录 FormatError 并保留该行）
    fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime>;
}

// ==========================================
// IdentifierParser Trait
// ==========================================
// 用途: 复合袋号解析接口（阶段 2）
// 实现者: BagIdParser
pub trait IdentifierParser: Send + Sync {
    /// 解析复合袋号为键值字段
    ///
    /// # 参数
    /// - raw: 原始袋号文本
    /// - row_number: 行号（用于错误定位）
    ///
    /// # 返回
    /// - Ok(ParsedIdentifierFields): 派生字段（可能为空）
    /// - Err(ParseError): 片段切分出多余部分
    fn parse(&self, raw: &str, row_number: usize) -> ReceivingResult<ParsedIdentifierFields>;
}
