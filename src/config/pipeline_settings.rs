// ==========================================
// 仓库收货监督 - 流水线参数快照
// ==========================================
// 职责: 将配置读取结果固化为单次运行使用的参数
// ==========================================

use crate::config::config_manager::defaults;
use crate::config::pipeline_config_trait::PipelineConfigReader;
use crate::importer::error::ReceivingResult;
use crate::importer::SheetLayout;
use chrono_tz::Tz;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub sheet_name: String,
    pub header_row_index: usize,
    pub display_tz: Tz,
    pub storage_tz: Tz,
    pub export_offset_suffix: String,
    pub scan_length_threshold: usize,
    pub length_band: RangeInclusive<usize>,
    pub dash_marker: String,
    pub locale: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sheet_name: defaults::SHEET_NAME.to_string(),
            header_row_index: defaults::HEADER_ROW_INDEX,
            display_tz: chrono_tz::Africa::Lusaka,
            storage_tz: chrono_tz::UTC,
            export_offset_suffix: defaults::EXPORT_OFFSET_SUFFIX.to_string(),
            scan_length_threshold: defaults::SCAN_LENGTH_THRESHOLD,
            length_band: defaults::LENGTH_BAND_MIN..=defaults::LENGTH_BAND_MAX,
            dash_marker: defaults::DASH_MARKER.to_string(),
            locale: defaults::LOCALE.to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn from_reader<C: PipelineConfigReader + ?Sized>(config: &C) -> ReceivingResult<Self> {
        Ok(Self {
            sheet_name: config.get_sheet_name()?,
            header_row_index: config.get_header_row_index()?,
            display_tz: config.get_display_timezone()?,
            storage_tz: config.get_storage_timezone()?,
            export_offset_suffix: config.get_export_offset_suffix()?,
            scan_length_threshold: config.get_scan_length_threshold()?,
            length_band: config.get_length_band()?,
            dash_marker: config.get_dash_marker()?,
            locale: config.get_locale()?,
        })
    }

    pub fn sheet_layout(&self) -> SheetLayout {
        SheetLayout {
            sheet_name: self.sheet_name.clone(),
            header_row_index: self.header_row_index,
        }
    }
}
