// ==========================================
// 仓库收货监督 - 复合袋号解析器
// ==========================================
// 语法: 以 ',' 切分片段；片段含 '=' 为 key=value，含 ': ' 为 key: value
// 顺序: 先应用全部 '=' 键值，再应用 ': ' 键值（同名键覆盖）
// 严格: 片段切分出多于两部分 → ParseError（整行不派生）
// ==========================================

use crate::domain::ParsedIdentifierFields;
use crate::importer::error::{ReceivingError, ReceivingResult};
use crate::importer::receiving_importer_trait::IdentifierParser;

const SEGMENT_SEPARATOR: char = ',';
const EQUALS_DELIMITER: &str = "=";
const COLON_DELIMITER: &str = ": ";

// ==========================================
// Segment - 片段分类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Equals { key: &'a str, value: &'a str },
    Colon { key: &'a str, value: &'a str },
    Both {
        equals: (&'a str, &'a str),
        colon: (&'a str, &'a str),
    },
    Unrecognised(&'a str),
}

impl<'a> Segment<'a> {
    /// 分类单个片段
    ///
    /// # 返回
    /// - Ok(Segment): 分类结果（键为空的键值对视为未识别）
    /// - Err(String): 分隔符切分出多余部分
    pub fn classify(segment: &'a str) -> Result<Segment<'a>, String> {
        let equals = split_pair(segment, EQUALS_DELIMITER)?;
        let colon = split_pair(segment, COLON_DELIMITER)?;

        Ok(match (equals, colon) {
            (Some(eq), Some(co)) => Segment::Both {
                equals: eq,
                colon: co,
            },
            (Some((key, value)), None) => Segment::Equals { key, value },
            (None, Some((key, value))) => Segment::Colon { key, value },
            (None, None) => Segment::Unrecognised(segment),
        })
    }

    fn equals_pair(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            Segment::Equals { key, value } => Some((key, value)),
            Segment::Both { equals, .. } => Some(equals),
            _ => None,
        }
    }

    fn colon_pair(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            Segment::Colon { key, value } => Some((key, value)),
            Segment::Both { colon, .. } => Some(colon),
            _ => None,
        }
    }
}

fn split_pair<'a>(segment: &'a str, delimiter: &str) -> Result<Option<(&'a str, &'a str)>, String> {
    if !segment.contains(delimiter) {
        return Ok(None);
    }

    let parts: Vec<&str> = segment.split(delimiter).collect();
    if parts.len() > 2 {
        return Err(format!(
            "片段 '{}' 含有 {} 个 '{}' 分隔符",
            segment.trim(),
            parts.len() - 1,
            delimiter
        ));
    }

    let key = parts[0].trim();
    if key.is_empty() {
        return Ok(None);
    }
    Ok(Some((key, parts[1].trim())))
}

// ==========================================
// BagIdParser - IdentifierParser 实现
// ==========================================
pub struct BagIdParser;

impl IdentifierParser for BagIdParser {
    fn parse(&self, raw: &str, row_number: usize) -> ReceivingResult<ParsedIdentifierFields> {
        let segments = raw
            .split(SEGMENT_SEPARATOR)
            .map(Segment::classify)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| ReceivingError::ParseError {
                row: row_number,
                message,
            })?;

        let mut fields = ParsedIdentifierFields::new();
        for (key, value) in segments.iter().filter_map(Segment::equals_pair) {
            fields.insert(key, value);
        }
        for (key, value) in segments.iter().filter_map(Segment::colon_pair) {
            fields.insert(key, value);
        }

        Ok(fields)
    }
}
