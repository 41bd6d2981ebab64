// ==========================================
// 仓库收货监督 - CSV 写出
// ==========================================
// 职责: 导出表 / 富化表 / 诊断视图写为 CSV，汇总写为 JSON
// 约定: 空值写为空字符串；表头总是写出（即使无数据行）
// ==========================================

use crate::domain::{
    DuplicateRow, EnrichedTable, ExceptionKind, ExceptionRow, ExportRecord, PipelineReport,
    TimeWindow, EXPORT_COLUMNS,
};
use crate::importer::error::{ReceivingError, ReceivingResult};
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 富化表文件名
pub const COMBINED_FILE_NAME: &str = "combined.csv";
/// 运行汇总文件名
pub const SUMMARY_FILE_NAME: &str = "summary.json";

fn export_error(err: impl std::fmt::Display) -> ReceivingError {
    ReceivingError::ExportWriteError(err.to_string())
}

fn write_rows<W, H, R>(writer: W, header: &[H], rows: R) -> ReceivingResult<()>
where
    W: Write,
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<Option<String>>>,
{
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(header.iter().map(|h| h.as_ref()))
        .map_err(export_error)?;
    for row in rows {
        wtr.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))
            .map_err(export_error)?;
    }
    wtr.flush().map_err(export_error)?;
    Ok(())
}

fn create_file(path: &Path) -> ReceivingResult<File> {
    File::create(path).map_err(|e| export_error(format!("{}: {}", path.display(), e)))
}

// ==========================================
// 导出表
// ==========================================

pub fn write_export<W: Write>(writer: W, records: &[ExportRecord]) -> ReceivingResult<()> {
    write_rows(
        writer,
        &EXPORT_COLUMNS,
        records.iter().map(|r| {
            r.values()
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect::<Vec<_>>()
        }),
    )
}

/// 写出导出文件（文件名由窗口边界决定）
pub fn write_export_file(
    output_dir: &Path,
    window: &TimeWindow,
    records: &[ExportRecord],
) -> ReceivingResult<PathBuf> {
    fs::create_dir_all(output_dir).map_err(export_error)?;
    let path = output_dir.join(window.export_file_name());
    write_export(create_file(&path)?, records)?;

    info!(path = %path.display(), rows = records.len(), "导出文件已写出");
    Ok(path)
}

// ==========================================
// 诊断视图
// ==========================================

pub fn write_combined<W: Write>(writer: W, table: &EnrichedTable) -> ReceivingResult<()> {
    write_rows(
        writer,
        &table.columns,
        table.records.iter().map(|record| {
            table
                .columns
                .iter()
                .map(|column| record.display_value(column))
                .collect::<Vec<_>>()
        }),
    )
}

pub fn write_duplicates<W: Write>(writer: W, rows: &[DuplicateRow]) -> ReceivingResult<()> {
    write_rows(
        writer,
        &DuplicateRow::COLUMNS,
        rows.iter().map(|row| {
            vec![
                row.added_times.clone(),
                Some(row.canonical_id.clone()),
                row.kico_seal.clone(),
                row.mms_seal.clone(),
                row.seal.clone(),
                row.lot.clone(),
                row.horse_registration.clone(),
            ]
        }),
    )
}

pub fn write_exception_rows<W: Write>(writer: W, rows: &[ExceptionRow]) -> ReceivingResult<()> {
    write_rows(
        writer,
        &ExceptionRow::COLUMNS,
        rows.iter().map(|row| {
            vec![
                row.added_time.clone(),
                row.bag_id.clone(),
                row.canonical_id.clone(),
                row.kico_seal.clone(),
                row.mms_seal.clone(),
                row.seal.clone(),
                row.lot.clone(),
                row.horse_registration.clone(),
            ]
        }),
    )
}

/// 写出全部诊断文件，返回写出的路径
pub fn write_diagnostics(output_dir: &Path, report: &PipelineReport) -> ReceivingResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(export_error)?;
    let mut written = Vec::new();

    let path = output_dir.join(COMBINED_FILE_NAME);
    write_combined(create_file(&path)?, &report.combined)?;
    written.push(path);

    let path = diagnostic_path(output_dir, ExceptionKind::Duplicate);
    write_duplicates(create_file(&path)?, &report.exceptions.duplicates)?;
    written.push(path);

    let views = [
        (ExceptionKind::Length, &report.exceptions.length_exceptions),
        (ExceptionKind::Dash, &report.exceptions.dash_exceptions),
        (
            ExceptionKind::UnresolvedIdentity,
            &report.exceptions.unresolved_identities,
        ),
    ];
    for (kind, rows) in views {
        let path = diagnostic_path(output_dir, kind);
        write_exception_rows(create_file(&path)?, rows)?;
        debug!(kind = %kind, rows = rows.len(), "诊断视图已写出");
        written.push(path);
    }

    let path = output_dir.join(SUMMARY_FILE_NAME);
    let json = serde_json::to_string_pretty(&report.summary).map_err(export_error)?;
    fs::write(&path, json).map_err(export_error)?;
    written.push(path);

    info!(dir = %output_dir.display(), files = written.len(), "诊断文件已写出");
    Ok(written)
}

pub fn diagnostic_path(output_dir: &Path, kind: ExceptionKind) -> PathBuf {
    output_dir.join(format!("{}.csv", kind.file_stem()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_write_export_header_only() {
        let mut buf = Vec::new();
        write_export(&mut buf, &[]).unwrap();

        assert_eq!(
            to_text(buf),
            "name,GRN_KICO_SEAL,MMS_SEAL_NO,GRN_WH_GROSS_WEIGHT,GRN_RECEIVED_DATE,\
ZAM_GRN_BAG_CONDITION_STATUS,GRN_WAREHOUSE_NAME,GRN_TRUCK_REG,WITNESS_GRN_USER,GRN_FORM_COMPLETE\n"
        );
    }

    #[test]
    fn test_write_export_nulls_as_empty() {
        let record = ExportRecord {
            name: Some("12345".to_string()),
            grn_form_complete: Some("2024-01-01 08:00:00+02:00".to_string()),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_export(&mut buf, &[record]).unwrap();

        let text = to_text(buf);
        let data_line = text.lines().nth(1).unwrap();
        assert_eq!(data_line, "12345,,,,,,,,,2024-01-01 08:00:00+02:00");
    }

    #[test]
    fn test_write_duplicates_quotes_joined_values() {
        let row = DuplicateRow {
            added_times: Some("2024-01-02 08:00:00, 2024-01-01 08:00:00".to_string()),
            canonical_id: "12345".to_string(),
            kico_seal: None,
            mms_seal: None,
            seal: Some("S1, S2".to_string()),
            lot: Some("L9".to_string()),
            horse_registration: None,
        };
        let mut buf = Vec::new();
        write_duplicates(&mut buf, &[row]).unwrap();

        let text = to_text(buf);
        assert!(text.starts_with("Added Time,Bag Scanned & Manual,KICO SEAL NO."));
        assert!(text.contains("\"S1, S2\""));
    }
}
