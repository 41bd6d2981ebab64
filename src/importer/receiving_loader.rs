// ==========================================
// 仓库收货监督 - 收货表加载器
// ==========================================
// 流程: 解析文件 → 清洗单元格 → 解析 Added Time → RawTable
// 红线: 缺少 Added Time 列立即失败；单行时间格式错误只记录
// ==========================================

use crate::domain::{columns, RawRecord, RawTable, RowIssue};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::error::{ReceivingError, ReceivingResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::receiving_importer_trait::{DataCleaner, FileParser, RawSheet, SheetLayout};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// 加载结果：原始表 + 行级问题（FormatError）
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub table: RawTable,
    pub issues: Vec<RowIssue>,
}

pub struct ReceivingLoader {
    file_parser: Box<dyn FileParser>,
    data_cleaner: Box<dyn DataCleaner>,
    layout: SheetLayout,
}

impl ReceivingLoader {
    pub fn new(
        file_parser: Box<dyn FileParser>,
        data_cleaner: Box<dyn DataCleaner>,
        layout: SheetLayout,
    ) -> Self {
        Self {
            file_parser,
            data_cleaner,
            layout,
        }
    }

    /// 使用默认解析器（Excel/CSV 自动识别）与默认清洗器
    pub fn with_layout(layout: SheetLayout) -> Self {
        Self::new(
            Box::new(UniversalFileParser),
            Box::new(DataCleanerImpl),
            layout,
        )
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// 从文件加载收货表
    #[instrument(skip(self, file_path), fields(sheet = %self.layout.sheet_name))]
    pub fn load(&self, file_path: &Path) -> ReceivingResult<LoadOutcome> {
        debug!(file = %file_path.display(), "开始加载收货表");
        let sheet = self.file_parser.parse_to_raw_records(file_path, &self.layout)?;
        self.build_table(sheet)
    }

    /// 由解析器输出构建 RawTable
    ///
    /// # 返回
    /// - Ok(LoadOutcome): 无法解析的 Added Time 置空并记录问题
    /// - Err(SchemaError): 表头缺少 Added Time
    pub fn build_table(&self, sheet: RawSheet) -> ReceivingResult<LoadOutcome> {
        if !sheet.headers.iter().any(|h| h == columns::ADDED_TIME) {
            return Err(ReceivingError::SchemaError {
                column: columns::ADDED_TIME.to_string(),
            });
        }

        let mut outcome = LoadOutcome {
            table: RawTable::new(sheet.headers),
            issues: Vec::new(),
        };

        for row in sheet.rows {
            let mut record = RawRecord::new(row.row_number);
            for (column, value) in row.values {
                let cleaned = self.data_cleaner.clean_text(&value);
                if let Some(value) = self.data_cleaner.normalize_null(Some(cleaned)) {
                    record.values.insert(column, value);
                }
            }

            if let Some(text) = record.get(columns::ADDED_TIME).map(str::to_string) {
                record.added_time = self.data_cleaner.parse_timestamp(&text);
                if record.added_time.is_none() {
                    let err = ReceivingError::FormatError {
                        row: record.row_number,
                        field: columns::ADDED_TIME.to_string(),
                        value: text,
                    };
                    warn!(row_number = record.row_number, error = %err, "时间戳无法解析，置空");
                    outcome.issues.push(RowIssue::warning(
                        record.row_number,
                        record.bag_id(),
                        columns::ADDED_TIME,
                        err.to_string(),
                    ));
                }
            }

            outcome.table.records.push(record);
        }

        info!(
            rows = outcome.table.len(),
            format_issues = outcome.issues.len(),
            "收货表加载完成"
        );
        Ok(outcome)
    }
}

impl Default for ReceivingLoader {
    fn default() -> Self {
        Self::with_layout(SheetLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::receiving_importer_trait::SheetRow;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn sheet(headers: &[&str], rows: Vec<Vec<(&str, &str)>>) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(idx, cells)| SheetRow {
                    row_number: idx + 3,
                    values: cells
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<HashMap<_, _>>(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_table_parses_added_time() {
        let loader = ReceivingLoader::default();
        let outcome = loader
            .build_table(sheet(
                &["Added Time", "BAG ID."],
                vec![vec![("Added Time", "2024-01-01 08:30:00"), ("BAG ID.", "AB-1")]],
            ))
            .unwrap();

        let record = &outcome.table.records[0];
        assert_eq!(
            record.added_time,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
        );
        assert_eq!(record.bag_id(), Some("AB-1"));
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_unparseable_added_time_recorded_row_kept() {
        let loader = ReceivingLoader::default();
        let outcome = loader
            .build_table(sheet(
                &["Added Time", "BAG ID."],
                vec![vec![("Added Time", "yesterday"), ("BAG ID.", "X1")]],
            ))
            .unwrap();

        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.records[0].added_time, None);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].field, "Added Time");
        assert_eq!(outcome.issues[0].bag_id.as_deref(), Some("X1"));
    }

    #[test]
    fn test_null_markers_dropped() {
        let loader = ReceivingLoader::default();
        let outcome = loader
            .build_table(sheet(
                &["Added Time", "BAG ID.", "Seal"],
                vec![vec![("Added Time", "NaT"), ("BAG ID.", "X1"), ("Seal", "nan")]],
            ))
            .unwrap();

        let record = &outcome.table.records[0];
        assert_eq!(record.get("Seal"), None);
        assert_eq!(record.added_time, None);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_missing_added_time_column_is_schema_error() {
        let loader = ReceivingLoader::default();
        let result = loader.build_table(sheet(&["BAG ID."], vec![]));

        assert!(matches!(
            result,
            Err(ReceivingError::SchemaError { ref column }) if column == "Added Time"
        ));
    }
}
