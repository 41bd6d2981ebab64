// ==========================================
// 仓库收货监督 - 领域类型定义
// ==========================================
// 依据: 收货表单导出格式（RawData 工作表）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 列名常量（源表 + 派生列）
// ==========================================
pub mod columns {
    // ===== 必需列 =====
    pub const ADDED_TIME: &str = "Added Time";
    pub const BAG_ID: &str = "BAG ID.";

    // ===== 派生列 =====
    pub const CANONICAL_ID: &str = "Bag Scanned & Manual";
    pub const BAG: &str = "Bag";
    pub const SEAL: &str = "Seal";
    pub const LOT: &str = "Lot";

    // ===== 可选源列 =====
    pub const KICO_SEAL: &str = "KICO SEAL NO.";
    pub const MMS_SEAL: &str = "MMS BAG SEAL NO";
    pub const HORSE_REGISTRATION: &str = "RECEIVING HORSE REGISTRATION";
    pub const GROSS_WEIGHT: &str = "RECEIVING WAREHOUSE PLATFORM SCALE GROSS WEIGHT (KG)";
    pub const OFFLOADING_TIME: &str = "BAG OFFLOADING TIME";
    pub const BAG_CONDITION: &str = "RECORD BAG CONDITION";
    pub const WAREHOUSE: &str = "RECEIVING WAREHOUSE";
    pub const ADDED_EMAIL: &str = "Added Email ID";
}

/// 时间戳文本格式（诊断表、导出列共用）
pub const TIMESTAMP_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// 行级问题级别
// ==========================================
// 对应 DQ 级别，收货场景只有告警一级（致命错误直接中断运行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueLevel {
    Warning, // 告警（行保留，部分字段置空）
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLevel::Warning => write!(f, "WARNING"),
        }
    }
}

// ==========================================
// 异常视图类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionKind {
    Duplicate,          // 同一袋号重复扫描
    Length,             // 袋号长度落在可疑区间
    Dash,               // 规范袋号含短横线
    UnresolvedIdentity, // 长袋号缺少 Bag 子字段
}

impl ExceptionKind {
    /// 诊断文件名（不含扩展名）
    pub fn file_stem(&self) -> &'static str {
        match self {
            ExceptionKind::Duplicate => "duplicates",
            ExceptionKind::Length => "length_exceptions",
            ExceptionKind::Dash => "dash_exceptions",
            ExceptionKind::UnresolvedIdentity => "unresolved_identities",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::Duplicate => write!(f, "DUPLICATE"),
            ExceptionKind::Length => write!(f, "LENGTH"),
            ExceptionKind::Dash => write!(f, "DASH"),
            ExceptionKind::UnresolvedIdentity => write!(f, "UNRESOLVED_IDENTITY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_kind_file_stem() {
        assert_eq!(ExceptionKind::Duplicate.file_stem(), "duplicates");
        assert_eq!(ExceptionKind::Dash.to_string(), "DASH");
    }

    #[test]
    fn test_exception_kind_serde() {
        let json = serde_json::to_string(&ExceptionKind::UnresolvedIdentity).unwrap();
        assert_eq!(json, "\"UNRESOLVED_IDENTITY\"");
    }
}
