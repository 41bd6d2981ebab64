// ==========================================
// 仓库收货监督 - 袋号字段提取
// ==========================================
// 职责: 对每行 BAG ID. 调用解析器，派生字段并入富化表
// 红线: 解析失败只影响该行（不派生字段），运行继续
// ==========================================

use crate::domain::{columns, EnrichedRecord, EnrichedTable, RawTable, RowIssue};
use crate::importer::bag_id_parser::BagIdParser;
use crate::importer::error::{ReceivingError, ReceivingResult};
use crate::importer::receiving_importer_trait::IdentifierParser;
use tracing::{debug, info, warn};

/// 提取结果：富化表 + 行级问题
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub table: EnrichedTable,
    pub issues: Vec<RowIssue>,
}

pub struct FieldExtractor {
    parser: Box<dyn IdentifierParser>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(Box::new(BagIdParser))
    }
}

impl FieldExtractor {
    pub fn new(parser: Box<dyn IdentifierParser>) -> Self {
        Self { parser }
    }

    /// 富化整张表
    ///
    /// # 返回
    /// - Ok(ExtractionOutcome): 列 = 源列 + 派生键（首次出现序）
    /// - Err(SchemaError): 缺少 BAG ID. 列
    pub fn enrich(&self, table: RawTable) -> ReceivingResult<ExtractionOutcome> {
        if !table.has_column(columns::BAG_ID) {
            return Err(ReceivingError::SchemaError {
                column: columns::BAG_ID.to_string(),
            });
        }

        debug!(rows = table.len(), "开始提取袋号字段");

        let mut outcome = ExtractionOutcome {
            table: EnrichedTable {
                columns: table.headers,
                records: Vec::with_capacity(table.records.len()),
            },
            issues: Vec::new(),
        };

        for raw in table.records {
            let mut record = EnrichedRecord::from_raw(raw);
            match self.apply(&mut record) {
                Ok(()) => {
                    for key in record.derived.keys() {
                        outcome.table.push_column(key);
                    }
                }
                Err(e) if e.is_row_level() => {
                    warn!(row_number = record.row_number(), error = %e, "袋号解析失败，该行不派生字段");
                    outcome.issues.push(RowIssue::warning(
                        record.row_number(),
                        record.bag_id(),
                        columns::BAG_ID,
                        e.to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
            outcome.table.records.push(record);
        }

        info!(
            rows = outcome.table.len(),
            columns = outcome.table.columns.len(),
            parse_issues = outcome.issues.len(),
            "袋号字段提取完成"
        );
        Ok(outcome)
    }

    /// 对单行（重新）派生字段
    ///
    /// 派生结果只取决于原始袋号，重复调用结果不变
    pub fn apply(&self, record: &mut EnrichedRecord) -> ReceivingResult<()> {
        record.derived.clear();
        let parsed = match record.bag_id() {
            Some(raw) => self.parser.parse(raw, record.row_number())?,
            None => return Ok(()),
        };
        record.derived = parsed;
        Ok(())
    }
}
