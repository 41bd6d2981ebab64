// ==========================================
// TimeWindowFilter 集成测试
// ==========================================
// 测试目标: 窗口缺省值补齐、时区换算、闭区间过滤与表序保持
// ==========================================


use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use receiving_supervision::domain::WindowRequest;
use receiving_supervision::engine::TimeWindowFilter;
use receiving_supervision::importer::ReceivingError;
use test_helpers::{enriched_table, row, ts};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap()
}

fn window_request(start: (i32, u32, u32), end: (i32, u32, u32)) -> WindowRequest {
    WindowRequest::new(
        NaiveDate::from_ymd_opt(start.0, start.1, start.2),
        NaiveTime::from_hms_opt(0, 0, 0),
        NaiveDate::from_ymd_opt(end.0, end.1, end.2),
        NaiveTime::from_hms_opt(0, 0, 0),
    )
}

#[test]
fn test_filter_keeps_table_order() {
    let mut table = enriched_table(&[
        row("2024-01-01 12:00:00", "AB-1"),
        row("2024-01-01 08:00:00", "AB-2"),
        row("2024-01-01 10:00:00", "AB-3"),
        row("2024-01-03 08:00:00", "AB-4"),
    ]);
    table.sort_by_added_time_desc();

    let filter = TimeWindowFilter::default();
    let window = filter
        .resolve(&window_request((2024, 1, 1), (2024, 1, 2)), None, now())
        .unwrap();
    let kept: Vec<&str> = filter
        .filter(&table, &window)
        .iter()
        .map(|r| r.bag_id().unwrap())
        .collect();

    assert_eq!(kept, vec!["AB-1", "AB-3", "AB-2"]);
}

#[test]
fn test_filter_excludes_null_timestamps() {
    let mut undated = row("2024-01-01 00:00:00", "AB-9");
    undated.added_time = None;
    let table = enriched_table(&[undated, row("2024-01-01 08:00:00", "AB-1")]);

    let filter = TimeWindowFilter::default();
    let window = filter
        .resolve(&WindowRequest::default(), table.earliest_added_time(), now())
        .unwrap();

    assert_eq!(filter.filter(&table, &window).len(), 1);
}

#[test]
fn test_late_utc_entry_falls_on_next_display_day() {
    // 23:59 UTC 对应 Lusaka 次日 01:59，不属于 1 月 1 日窗口
    let table = enriched_table(&[
        row("2024-01-01 23:59:00", "AB-1"),
        row("2024-01-01 21:59:00", "AB-2"),
    ]);

    let filter = TimeWindowFilter::default();
    let window = filter
        .resolve(&window_request((2024, 1, 1), (2024, 1, 2)), None, now())
        .unwrap();
    let kept = filter.filter(&table, &window);

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].bag_id(), Some("AB-2"));
}

#[test]
fn test_same_storage_and_display_zone_compares_wall_clock() {
    let filter = TimeWindowFilter::new(chrono_tz::Africa::Lusaka, chrono_tz::Africa::Lusaka);
    let window = filter
        .resolve(&window_request((2024, 1, 1), (2024, 1, 2)), None, now())
        .unwrap();

    assert!(filter.contains(&window, Some(ts("2024-01-01 23:59:00"))));
    assert!(filter.contains(&window, Some(ts("2024-01-02 00:00:00"))));
    assert!(!filter.contains(&window, Some(ts("2024-01-02 00:00:01"))));
}

#[test]
fn test_end_date_without_time_uses_current_time() {
    let filter = TimeWindowFilter::default();
    let request = WindowRequest::new(
        NaiveDate::from_ymd_opt(2024, 1, 1),
        None,
        NaiveDate::from_ymd_opt(2024, 1, 3),
        None,
    );
    let window = filter.resolve(&request, None, now()).unwrap();

    // now = 10:30 UTC = 12:30 Lusaka
    assert_eq!(window.end_text(), "2024-01-03 12:30:00 +02:00");
    assert_eq!(
        window.export_file_name(),
        "From_20240101_0000_to_20240103_1230_Receiving.csv"
    );
}

#[test]
fn test_start_defaults_to_earliest_display_date() {
    let filter = TimeWindowFilter::default();
    let window = filter
        .resolve(
            &WindowRequest::default(),
            Some(ts("2023-12-31 23:00:00")),
            now(),
        )
        .unwrap();

    // 2023-12-31 23:00 UTC = 2024-01-01 01:00 Lusaka
    assert_eq!(window.start_text(), "2024-01-01 00:00:00 +02:00");
}

#[test]
fn test_nonexistent_local_time_rejected() {
    // 2024-03-10 02:30 在 America/New_York 因夏令时跳变而不存在
    let filter = TimeWindowFilter::new(chrono_tz::America::New_York, chrono_tz::UTC);
    let request = WindowRequest::new(
        NaiveDate::from_ymd_opt(2024, 3, 10),
        NaiveTime::from_hms_opt(2, 30, 0),
        NaiveDate::from_ymd_opt(2024, 3, 11),
        NaiveTime::from_hms_opt(0, 0, 0),
    );

    assert!(matches!(
        filter.resolve(&request, None, now()),
        Err(ReceivingError::InvalidTimeWindow(_))
    ));
}

#[test]
fn test_zero_length_window_is_valid() {
    let filter = TimeWindowFilter::default();
    let request = window_request((2024, 1, 1), (2024, 1, 1));
    let window = filter.resolve(&request, None, now()).unwrap();

    assert_eq!(window.start, window.end);
    // 2023-12-31 22:00 UTC = 2024-01-01 00:00 Lusaka
    assert!(filter.contains(&window, Some(ts("2023-12-31 22:00:00"))));
}
