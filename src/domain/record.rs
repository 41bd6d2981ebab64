// ==========================================
// 仓库收货监督 - 收货记录领域模型
// ==========================================
// 职责: 原始行 / 袋号派生字段 / 富化行 / 富化表
// 红线: 所有实体均为单次运行内派生，不落库
// ==========================================

use crate::domain::types::{columns, TIMESTAMP_TEXT_FORMAT};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// 格式化时间戳为导出/诊断文本
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_TEXT_FORMAT).to_string()
}

// ==========================================
// RawRecord - 原始收货行
// ==========================================
// 用途: 加载层写入，之后只读
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub row_number: usize,                    // 原始文件物理行号（1 起）
    pub values: HashMap<String, String>,      // 列名 → 单元格文本（空单元格不入表）
    pub added_time: Option<NaiveDateTime>,    // Added Time 解析结果（无法解析为 None）
}

impl RawRecord {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            values: HashMap::new(),
            added_time: None,
        }
    }

    /// 读取单元格（空字符串视为空值）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// 原始袋号（BAG ID.）
    pub fn bag_id(&self) -> Option<&str> {
        self.get(columns::BAG_ID)
    }
}

// ==========================================
// RawTable - 原始收货表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>, // 表头（保持工作表列序）
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ParsedIdentifierFields - 袋号派生字段
// ==========================================
// 保持首次出现顺序；同名键后写覆盖前写
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedIdentifierFields {
    entries: Vec<(String, String)>,
}

impl ParsedIdentifierFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入字段，已存在的键原位覆盖
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ==========================================
// EnrichedRecord - 富化收货行
// ==========================================
// RawRecord ⊕ 袋号派生字段 ⊕ 规范袋号（Bag Scanned & Manual）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    pub derived: ParsedIdentifierFields,
    pub canonical_id: Option<String>,
}

impl EnrichedRecord {
    pub fn from_raw(raw: RawRecord) -> Self {
        Self {
            raw,
            derived: ParsedIdentifierFields::new(),
            canonical_id: None,
        }
    }

    pub fn row_number(&self) -> usize {
        self.raw.row_number
    }

    pub fn added_time(&self) -> Option<NaiveDateTime> {
        self.raw.added_time
    }

    pub fn bag_id(&self) -> Option<&str> {
        self.raw.bag_id()
    }

    /// 按列名取值
    ///
    /// # 规则
    /// - Bag Scanned & Manual → 规范袋号
    /// - 派生字段优先于同名源列
    /// - 其余取源列
    pub fn field(&self, column: &str) -> Option<&str> {
        if column == columns::CANONICAL_ID {
            return self.canonical_id.as_deref();
        }
        self.derived
            .get(column)
            .filter(|v| !v.is_empty())
            .or_else(|| self.raw.get(column))
    }

    /// 按列名取展示文本（Added Time 使用解析后的时间戳）
    pub fn display_value(&self, column: &str) -> Option<String> {
        if column == columns::ADDED_TIME {
            return self.raw.added_time.as_ref().map(format_timestamp);
        }
        self.field(column).map(str::to_string)
    }
}

// ==========================================
// EnrichedTable - 富化收货表（Combined 表）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedTable {
    pub columns: Vec<String>, // 源列 + 派生列（首次出现序）+ 规范袋号列
    pub records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// 追加列（已存在则忽略）
    pub fn push_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 最早的 Added Time
    pub fn earliest_added_time(&self) -> Option<NaiveDateTime> {
        self.records.iter().filter_map(|r| r.added_time()).min()
    }

    /// 按 Added Time 降序排序（稳定排序，空时间戳置后）
    pub fn sort_by_added_time_desc(&mut self) {
        self.records
            .sort_by(|a, b| b.added_time().cmp(&a.added_time()));
    }
}
