// ==========================================
// SchemaMapper 集成测试
// ==========================================
// 测试目标: 固定 10 列导出映射、偏移后缀、空值处理
// ==========================================


use receiving_supervision::domain::{columns, EXPORT_COLUMNS};
use receiving_supervision::engine::SchemaMapper;
use receiving_supervision::exporter::write_export;
use test_helpers::{enriched_table, row};

#[test]
fn test_full_row_mapping() {
    let table = enriched_table(&[row("2024-01-02 10:00:00", "Bag=12345,Seal=S1,Lot=L9")
        .with(columns::KICO_SEAL, "K1")
        .with(columns::MMS_SEAL, "M1")
        .with(columns::GROSS_WEIGHT, "50.5")
        .with(columns::OFFLOADING_TIME, "2024-01-02 09:40:00")
        .with(columns::BAG_CONDITION, "Good")
        .with(columns::WAREHOUSE, "Kitwe")
        .with(columns::HORSE_REGISTRATION, "ABC 123")
        .with(columns::ADDED_EMAIL, "clerk@example.com")]);

    let export = SchemaMapper::default().map_record(&table.records[0]);

    assert_eq!(
        export.values(),
        [
            Some("12345"),
            Some("K1"),
            Some("M1"),
            Some("50.5"),
            Some("2024-01-02 09:40:00+02:00"),
            Some("Good"),
            Some("Kitwe"),
            Some("ABC 123"),
            Some("clerk@example.com"),
            Some("2024-01-02 10:00:00+02:00"),
        ]
    );
}

#[test]
fn test_sparse_input_still_has_all_columns() {
    // 只有 Added Time 与 BAG ID. 两列
    let table = enriched_table(&[row("2024-01-02 10:00:00", "AB-123")]);
    let export = SchemaMapper::default().map_records(&table.records);

    let mut buf = Vec::new();
    write_export(&mut buf, &export).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], EXPORT_COLUMNS.join(","));
    assert_eq!(lines[1], "AB-123,,,,,,,,,2024-01-02 10:00:00+02:00");
    assert_eq!(lines[1].split(',').count(), 10);
}

#[test]
fn test_unresolved_identity_exports_empty_name() {
    let table = enriched_table(&[row("2024-01-02 10:00:00", "Seal=S5,Lot=L5,Horse=H5")]);
    let export = SchemaMapper::default().map_record(&table.records[0]);

    assert_eq!(export.name, None);
    assert!(export.grn_form_complete.is_some());
}

#[test]
fn test_empty_suffix_leaves_time_text() {
    let table = enriched_table(&[row("2024-01-02 10:00:00", "AB-1")]);
    let export = SchemaMapper::new("").map_record(&table.records[0]);

    assert_eq!(export.grn_form_complete.as_deref(), Some("2024-01-02 10:00:00"));
}

#[test]
fn test_map_records_preserves_order() {
    let table = enriched_table(&[
        row("2024-01-01 08:00:00", "AB-1"),
        row("2024-01-03 08:00:00", "AB-2"),
        row("2024-01-02 08:00:00", "AB-3"),
    ]);
    let names: Vec<Option<String>> = SchemaMapper::default()
        .map_records(&table.records)
        .into_iter()
        .map(|r| r.name)
        .collect();

    assert_eq!(
        names,
        vec![
            Some("AB-1".to_string()),
            Some("AB-2".to_string()),
            Some("AB-3".to_string())
        ]
    );
}
