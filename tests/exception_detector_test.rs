// ==========================================
// ExceptionDetector 集成测试
// ==========================================
// 测试目标: 重复袋号合并 / 长度区间 / 短横线 / 未解析袋号四个视图
// ==========================================


use receiving_supervision::domain::columns;
use receiving_supervision::engine::ExceptionDetector;
use test_helpers::{enriched_table, row};

// ==========================================
// 重复袋号
// ==========================================

#[test]
fn test_duplicates_consolidate_newest_first() {
    // S1 行较新，合并后 S1 在前
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "Bag=12345,Seal=S2,Lot=L9"),
        row("2024-01-02 08:00:00", "Bag=12345,Seal=S1,Lot=L9"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.duplicates.len(), 1);

    let dup = &views.duplicates[0];
    assert_eq!(dup.canonical_id, "12345");
    assert_eq!(dup.seal.as_deref(), Some("S1, S2"));
    assert_eq!(dup.lot.as_deref(), Some("L9"));
    assert_eq!(
        dup.added_times.as_deref(),
        Some("2024-01-02 08:00:00, 2024-01-01 08:00:00")
    );
    assert_eq!(dup.kico_seal, None);
}

#[test]
fn test_duplicates_singletons_excluded_and_groups_once() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "AB-1"),
        row("2024-01-01 09:00:00", "AB-2"),
        row("2024-01-01 10:00:00", "AB-1"),
        row("2024-01-01 11:00:00", "AB-1"),
        row("2024-01-01 12:00:00", "ZM7"),
        row("2024-01-01 13:00:00", "ZM7"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    let ids: Vec<&str> = views
        .duplicates
        .iter()
        .map(|d| d.canonical_id.as_str())
        .collect();

    // 按各组最新时间降序，每组恰好一行
    assert_eq!(ids, vec!["ZM7", "AB-1"]);
    assert_eq!(
        views.duplicates[1].added_times.as_deref(),
        Some("2024-01-01 11:00:00, 2024-01-01 10:00:00, 2024-01-01 08:00:00")
    );
}

#[test]
fn test_duplicates_scanned_and_manual_share_identity() {
    // 扫码串与手工录入解析到同一规范袋号
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "Bag=778899,Seal=S1,Lot=L1")
            .with(columns::KICO_SEAL, "K1"),
        row("2024-01-01 09:00:00", "778899").with(columns::KICO_SEAL, "K1"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.duplicates.len(), 1);
    assert_eq!(views.duplicates[0].canonical_id, "778899");
    assert_eq!(views.duplicates[0].kico_seal.as_deref(), Some("K1"));
    assert_eq!(views.duplicates[0].seal.as_deref(), Some("S1"));
}

#[test]
fn test_null_identity_never_duplicates() {
    let mut specs = vec![
        row("2024-01-01 08:00:00", "Seal=S5,Lot=L5,Horse=H5"),
        row("2024-01-01 09:00:00", "Seal=S6,Lot=L6,Horse=H6"),
    ];
    let mut missing = row("2024-01-01 10:00:00", "");
    missing.bag_id = None;
    specs.push(missing);

    let views = ExceptionDetector::default().detect(&enriched_table(&specs));
    assert!(views.duplicates.is_empty());
}

// ==========================================
// 长度区间
// ==========================================

#[test]
fn test_length_band_boundaries() {
    let len15 = "A".repeat(15);
    let len16 = "A".repeat(16);
    let len25 = "A".repeat(25);
    let len26 = "A".repeat(26);
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", &len15),
        row("2024-01-01 09:00:00", &len16),
        row("2024-01-01 10:00:00", &len25),
        row("2024-01-01 11:00:00", &len26),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    let lengths: Vec<usize> = views
        .length_exceptions
        .iter()
        .map(|r| r.bag_id.as_deref().unwrap().len())
        .collect();
    assert_eq!(lengths, vec![25, 16]);
}

#[test]
fn test_length_view_keeps_canonical_id() {
    // 24 个字符的扫码串
    let table = enriched_table(&[row("2024-01-01 08:00:00", "Bag=12345,Seal=S1,Lot=L9")]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.length_exceptions.len(), 1);
    assert_eq!(
        views.length_exceptions[0].canonical_id.as_deref(),
        Some("12345")
    );
    assert_eq!(views.length_exceptions[0].seal.as_deref(), Some("S1"));
}

#[test]
fn test_custom_length_band() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "ABCDE"),
        row("2024-01-01 09:00:00", "ABCDEFGHIJ"),
    ]);

    let detector = ExceptionDetector::new(1..=5, "-", 20);
    let views = detector.detect(&table);
    assert_eq!(views.length_exceptions.len(), 1);
    assert_eq!(views.length_exceptions[0].bag_id.as_deref(), Some("ABCDE"));
}

// ==========================================
// 短横线
// ==========================================

#[test]
fn test_dash_on_canonical_id() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "AB-123"),
        row("2024-01-01 09:00:00", "AB123"),
        // 原始串含短横线，但规范袋号不含
        row("2024-01-01 10:00:00", "Bag=99999,Seal=S-1,Lot=L1"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.dash_exceptions.len(), 1);
    assert_eq!(views.dash_exceptions[0].canonical_id.as_deref(), Some("AB-123"));
    assert_eq!(views.dash_exceptions[0].bag_id.as_deref(), Some("AB-123"));
}

#[test]
fn test_custom_dash_marker() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "AB/123"),
        row("2024-01-01 09:00:00", "AB-123"),
    ]);

    let views = ExceptionDetector::new(16..=25, "/", 20).detect(&table);
    assert_eq!(views.dash_exceptions.len(), 1);
    assert_eq!(views.dash_exceptions[0].bag_id.as_deref(), Some("AB/123"));
}

// ==========================================
// 未解析袋号与排序
// ==========================================

#[test]
fn test_unresolved_identities() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "Seal=S5,Lot=L5,Horse=H5"),
        row("2024-01-01 09:00:00", "Bag=1,Seal=S1,Lot=L1,Horse=H"),
        row("2024-01-01 10:00:00", "SHORT"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.unresolved_identities.len(), 1);
    let unresolved = &views.unresolved_identities[0];
    assert_eq!(unresolved.bag_id.as_deref(), Some("Seal=S5,Lot=L5,Horse=H5"));
    assert_eq!(unresolved.canonical_id, None);
}

#[test]
fn test_views_ordered_descending_with_null_time_last() {
    let mut undated = row("2024-01-01 00:00:00", "AB-3");
    undated.added_time = None;
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "AB-1"),
        undated,
        row("2024-01-03 08:00:00", "AB-2"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    let ids: Vec<&str> = views
        .dash_exceptions
        .iter()
        .map(|r| r.canonical_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["AB-2", "AB-1", "AB-3"]);
    assert_eq!(views.dash_exceptions[2].added_time, None);
}

#[test]
fn test_views_overlap() {
    // 同一行可同时出现在重复、长度、短横线视图
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "Bag=AB-12,Seal=S1,Lot=L1"),
        row("2024-01-01 09:00:00", "Bag=AB-12,Seal=S2,Lot=L1"),
    ]);

    let views = ExceptionDetector::default().detect(&table);
    assert_eq!(views.duplicates.len(), 1);
    assert_eq!(views.length_exceptions.len(), 2);
    assert_eq!(views.dash_exceptions.len(), 2);
}
