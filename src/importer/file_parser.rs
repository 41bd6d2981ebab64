// ==========================================
// 仓库收货监督 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 布局: 第一行为标题横幅（丢弃），表头位于 header_row_index 行
// ==========================================

use crate::domain::TIMESTAMP_TEXT_FORMAT;
use crate::importer::error::{ReceivingError, ReceivingResult};
use crate::importer::receiving_importer_trait::{FileParser, RawSheet, SheetLayout, SheetRow};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ReceivingResult<()> {
    if !path.exists() {
        return Err(ReceivingError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// 表格 → RawSheet（Excel/CSV 共用）
// ==========================================

/// 将二维文本表转换为 RawSheet
///
/// # 参数
/// - rows: 单元格文本，rows[0] 对应物理行 first_row_offset（0 起）
/// - layout: 表头所在物理行
/// - first_row_offset: rows[0] 的物理行索引
///
/// # 规则
/// - 表头之前的行丢弃
/// - 空表头命名为 "Unnamed: {列号}"，重复表头追加 ".1"/".2" 后缀
/// - 全空行跳过，空单元格不入表
pub fn rows_to_sheet(
    rows: Vec<Vec<String>>,
    layout: &SheetLayout,
    first_row_offset: usize,
) -> ReceivingResult<RawSheet> {
    let header_index = layout.header_row_index.saturating_sub(first_row_offset);
    let mut iter = rows.into_iter().enumerate().skip(header_index);

    let (_, header_row) = iter.next().ok_or_else(|| ReceivingError::EmptySheet {
        sheet: layout.sheet_name.clone(),
        header_row_index: layout.header_row_index,
    })?;
    let headers = dedupe_headers(header_row);

    let mut sheet_rows = Vec::new();
    for (idx, row) in iter {
        let mut values = HashMap::new();
        for (col_idx, value) in row.into_iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    values.insert(header.clone(), trimmed.to_string());
                }
            }
        }

        // 跳过完全空白的行
        if values.is_empty() {
            continue;
        }

        sheet_rows.push(SheetRow {
            row_number: first_row_offset + idx + 1,
            values,
        });
    }

    Ok(RawSheet {
        headers,
        rows: sheet_rows,
    })
}

fn dedupe_headers(header_row: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header_row
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell.trim().trim_start_matches('\u{feff}').to_string();
            let base = if base.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                base
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

// ==========================================
// 单元格渲染
// ==========================================

const SECONDS_PER_DAY: i64 = 86_400;

/// Excel 序列日期 → 文本（1899-12-30 纪元，精确到秒）
///
/// 不足一天的序列值是纯时刻单元格，只输出 HH:MM:SS
fn format_excel_serial(value: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (value * SECONDS_PER_DAY as f64).round() as i64;
    let dt = epoch.checked_add_signed(Duration::seconds(seconds))?;

    if (0..SECONDS_PER_DAY).contains(&seconds) {
        Some(dt.format(TIME_OF_DAY_FORMAT).to_string())
    } else {
        Some(dt.format(TIMESTAMP_TEXT_FORMAT).to_string())
    }
}

/// 渲染单元格为文本
///
/// - 整数值浮点数不带小数部分（袋号/封条号常被 Excel 存为数字）
/// - 日期时间单元格统一为 YYYY-MM-DD HH:MM:SS，纯时刻单元格为 HH:MM:SS
/// - 错误单元格视为空
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_excel_serial(dt.as_f64()).unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
        layout: &SheetLayout,
    ) -> ReceivingResult<RawSheet> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ReceivingError::UnsupportedFormat(ext));
        }

        // CSV 无工作表概念，按同样的横幅 + 表头布局读取
        debug!(sheet = %layout.sheet_name, "CSV 输入忽略工作表名");

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        }

        rows_to_sheet(rows, layout, 0)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
        layout: &SheetLayout,
    ) -> ReceivingResult<RawSheet> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ReceivingError::UnsupportedFormat(ext));
        }

        let mut workbook: Sheets<_> = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        if !sheet_names.iter().any(|name| name == &layout.sheet_name) {
            return Err(ReceivingError::SheetNotFound {
                sheet: layout.sheet_name.clone(),
                available: sheet_names.join(", "),
            });
        }

        let range = workbook.worksheet_range(&layout.sheet_name)?;

        // Range 从首个非空单元格开始，行号需按起点换算
        let (start_row, _) = range.start().unwrap_or((0, 0));
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        debug!(
            sheet = %layout.sheet_name,
            start_row = start_row,
            rows = rows.len(),
            "工作表读取完成"
        );

        rows_to_sheet(rows, layout, start_row as usize)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
        layout: &SheetLayout,
    ) -> ReceivingResult<RawSheet> {
        let ext = extension_of(file_path);

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(file_path, layout),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_to_raw_records(file_path, layout),
            _ => Err(ReceivingError::UnsupportedFormat(ext)),
        }
    }
}
