// ==========================================
// 仓库收货监督 - 规范袋号判定
// ==========================================
// 规则: 原始袋号长度 > 阈值 → 视为扫码串，取派生 Bag 子字段
//       否则 → 视为手工录入，原样使用
// 输出: Bag Scanned & Manual 列
// ==========================================

use crate::domain::{columns, EnrichedTable};
use tracing::{debug, info, instrument};

/// 扫码串长度阈值（字符数）
pub const DEFAULT_SCAN_LENGTH_THRESHOLD: usize = 20;

/// 按默认阈值计算规范袋号
///
/// 长袋号缺少 Bag 子字段时返回 None（记入未解析视图）
pub fn canonical_id(raw_identifier: &str, derived_bag: Option<&str>) -> Option<String> {
    IdentityResolver::default().resolve(Some(raw_identifier), derived_bag)
}

// ==========================================
// IdentityResolver
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityResolver {
    scan_length_threshold: usize,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_LENGTH_THRESHOLD)
    }
}

impl IdentityResolver {
    pub fn new(scan_length_threshold: usize) -> Self {
        Self {
            scan_length_threshold,
        }
    }

    pub fn scan_length_threshold(&self) -> usize {
        self.scan_length_threshold
    }

    /// 是否为扫码串（字符数严格大于阈值）
    pub fn is_scanned(&self, raw_identifier: &str) -> bool {
        raw_identifier.chars().count() > self.scan_length_threshold
    }

    pub fn resolve(&self, raw_identifier: Option<&str>, derived_bag: Option<&str>) -> Option<String> {
        let raw = raw_identifier?;
        if self.is_scanned(raw) {
            derived_bag
                .filter(|bag| !bag.is_empty())
                .map(str::to_string)
        } else {
            Some(raw.to_string())
        }
    }

    /// 为整表写入规范袋号，返回未解析（长袋号无 Bag）行数
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn resolve_table(&self, table: &mut EnrichedTable) -> usize {
        let mut unresolved = 0;
        for record in &mut table.records {
            record.canonical_id = self.resolve(record.bag_id(), record.derived.get(columns::BAG));
            if record.canonical_id.is_none() && record.bag_id().is_some() {
                debug!(row_number = record.row_number(), "长袋号缺少 Bag 子字段");
                unresolved += 1;
            }
        }
        table.push_column(columns::CANONICAL_ID);

        info!(unresolved = unresolved, "规范袋号计算完成");
        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnrichedRecord, RawRecord};

    #[test]
    fn test_short_identifier_used_verbatim() {
        assert_eq!(canonical_id("AB-123", None), Some("AB-123".to_string()));
        // 20 个字符仍视为手工录入
        let twenty = "ABCDEFGHIJ0123456789";
        assert_eq!(twenty.chars().count(), 20);
        assert_eq!(canonical_id(twenty, Some("X")), Some(twenty.to_string()));
    }

    #[test]
    fn test_long_identifier_uses_derived_bag() {
        let raw = "Bag=12345,Seal=S1,Lot=L9";
        assert_eq!(canonical_id(raw, Some("12345")), Some("12345".to_string()));
    }

    #[test]
    fn test_long_identifier_without_bag_is_unresolved() {
        assert_eq!(canonical_id("Seal=S1,Lot=L9,Horse=H1", None), None);
        assert_eq!(canonical_id("Seal=S1,Lot=L9,Horse=H1", Some("")), None);
    }

    #[test]
    fn test_length_counted_in_characters() {
        let resolver = IdentityResolver::default();
        // 20 个字符，但 UTF-8 字节数大于 20
        let raw = "ÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉ";
        assert!(raw.len() > 20);
        assert!(!resolver.is_scanned(raw));
    }

    #[test]
    fn test_custom_threshold() {
        let resolver = IdentityResolver::new(5);
        assert_eq!(resolver.resolve(Some("ABCDEF"), Some("B1")), Some("B1".to_string()));
        assert_eq!(resolver.resolve(Some("ABCDE"), Some("B1")), Some("ABCDE".to_string()));
        assert_eq!(resolver.resolve(None, Some("B1")), None);
    }

    #[test]
    fn test_resolve_table_counts_unresolved() {
        let mut table = EnrichedTable::default();
        for (idx, bag_id) in ["AB-123", "Seal=S1,Lot=L9,Horse=H1"].iter().enumerate() {
            let mut raw = RawRecord::new(idx + 3);
            raw.values
                .insert(columns::BAG_ID.to_string(), bag_id.to_string());
            table.records.push(EnrichedRecord::from_raw(raw));
        }
        table.records.push(EnrichedRecord::from_raw(RawRecord::new(5)));

        let unresolved = IdentityResolver::default().resolve_table(&mut table);

        assert_eq!(unresolved, 1);
        assert!(table.has_column(columns::CANONICAL_ID));
        assert_eq!(table.records[0].canonical_id.as_deref(), Some("AB-123"));
        assert_eq!(table.records[1].canonical_id, None);
        assert_eq!(table.records[2].canonical_id, None);
    }
}
