// ==========================================
// 仓库收货监督 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源: JSON 文件（扁平 key-value）→ 环境变量 RECEIVING_<KEY> 覆写 → 默认值
// ==========================================

use crate::config::pipeline_config_trait::PipelineConfigReader;
use crate::importer::error::{ReceivingError, ReceivingResult};
use chrono_tz::Tz;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "RECEIVING_";

const CONFIG_DIR_NAME: &str = "receiving-supervision";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从 JSON 文件读取配置
    ///
    /// # 格式
    /// 扁平对象，值为字符串/数字/布尔；null 视为未配置
    pub fn from_json_file(path: &Path) -> ReceivingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReceivingError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manager = Self::from_json_str(&content)?;
        debug!(path = %path.display(), keys = manager.values.len(), "配置文件已加载");
        Ok(manager)
    }

    pub fn from_json_str(content: &str) -> ReceivingResult<Self> {
        let root: Value = serde_json::from_str(content)?;
        let object = root.as_object().ok_or_else(|| ReceivingError::ConfigReadError {
            key: "<root>".to_string(),
            message: "配置文件必须是 JSON 对象".to_string(),
        })?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ReceivingError::ConfigValueError {
                        key: key.clone(),
                        value: other.to_string(),
                        message: "仅支持字符串、数字或布尔值".to_string(),
                    })
                }
            };
            values.insert(key.clone(), text);
        }

        Ok(Self { values })
    }

    /// 默认配置文件路径（用户配置目录下）
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 加载配置
    ///
    /// # 参数
    /// - config_path: 显式指定的配置文件（必须存在）；None 时尝试默认路径
    pub fn load(config_path: Option<&Path>) -> ReceivingResult<Self> {
        let manager = match config_path {
            Some(path) => Self::from_json_file(path)?,
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_json_file(&path)?,
                None => Self::new(),
            },
        };
        Ok(manager.with_env_overrides())
    }

    /// 应用进程环境变量覆写
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// 应用 RECEIVING_<UPPER_KEY> 形式的覆写（仅识别已知配置键）
    pub fn with_overrides_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_lowercase();
            if config_keys::ALL.contains(&key.as_str()) {
                debug!(key = %key, "环境变量覆写配置");
                self.values.insert(key, value);
            }
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    fn get_usize_or_default(&self, key: &str, default: usize) -> usize {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.parse::<usize>().unwrap_or_else(|_| {
                warn!(config_key = key, raw_value = %raw, default = default, "配置值不是非负整数，使用默认值");
                default
            }),
        }
    }

    fn get_timezone(&self, key: &str, default: &str) -> ReceivingResult<Tz> {
        let value = self.get_config_or_default(key, default);
        value
            .parse::<Tz>()
            .map_err(|e| ReceivingError::ConfigValueError {
                key: key.to_string(),
                value: value.clone(),
                message: format!("无效的 IANA 时区: {}", e),
            })
    }

    /// 获取有效配置快照（JSON，已合并默认值）
    pub fn get_config_snapshot(&self) -> ReceivingResult<String> {
        let mut effective: BTreeMap<&str, String> = config_keys::ALL
            .iter()
            .map(|key| {
                let default = config_keys::default_value(key).unwrap_or_default();
                (*key, self.get_config_or_default(key, default))
            })
            .collect();
        for (key, value) in &self.values {
            effective.entry(key.as_str()).or_insert_with(|| value.clone());
        }

        Ok(serde_json::to_string_pretty(&json!(effective))?)
    }
}

// ==========================================
// PipelineConfigReader Trait 实现
// ==========================================
impl PipelineConfigReader for ConfigManager {
    fn get_sheet_name(&self) -> ReceivingResult<String> {
        Ok(self.get_config_or_default(config_keys::SHEET_NAME, defaults::SHEET_NAME))
    }

    fn get_header_row_index(&self) -> ReceivingResult<usize> {
        Ok(self.get_usize_or_default(config_keys::HEADER_ROW_INDEX, defaults::HEADER_ROW_INDEX))
    }

    fn get_display_timezone(&self) -> ReceivingResult<Tz> {
        self.get_timezone(config_keys::DISPLAY_TIMEZONE, defaults::DISPLAY_TIMEZONE)
    }

    fn get_storage_timezone(&self) -> ReceivingResult<Tz> {
        self.get_timezone(config_keys::STORAGE_TIMEZONE, defaults::STORAGE_TIMEZONE)
    }

    fn get_export_offset_suffix(&self) -> ReceivingResult<String> {
        // 后缀允许为空串（显式配置 "" 时不追加）
        Ok(self
            .values
            .get(config_keys::EXPORT_OFFSET_SUFFIX)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| defaults::EXPORT_OFFSET_SUFFIX.to_string()))
    }

    fn get_scan_length_threshold(&self) -> ReceivingResult<usize> {
        Ok(self.get_usize_or_default(
            config_keys::SCAN_LENGTH_THRESHOLD,
            defaults::SCAN_LENGTH_THRESHOLD,
        ))
    }

    fn get_length_band(&self) -> ReceivingResult<RangeInclusive<usize>> {
        let min = self.get_usize_or_default(config_keys::LENGTH_BAND_MIN, defaults::LENGTH_BAND_MIN);
        let max = self.get_usize_or_default(config_keys::LENGTH_BAND_MAX, defaults::LENGTH_BAND_MAX);
        if min > max {
            return Err(ReceivingError::ConfigValueError {
                key: config_keys::LENGTH_BAND_MIN.to_string(),
                value: format!("{}..={}", min, max),
                message: "长度区间下限大于上限".to_string(),
            });
        }
        Ok(min..=max)
    }

    fn get_dash_marker(&self) -> ReceivingResult<String> {
        Ok(self.get_config_or_default(config_keys::DASH_MARKER, defaults::DASH_MARKER))
    }

    fn get_locale(&self) -> ReceivingResult<String> {
        Ok(self.get_config_or_default(config_keys::LOCALE, defaults::LOCALE))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 加载
    pub const SHEET_NAME: &str = "sheet_name";
    pub const HEADER_ROW_INDEX: &str = "header_row_index";

    // 时区
    pub const DISPLAY_TIMEZONE: &str = "display_timezone";
    pub const STORAGE_TIMEZONE: &str = "storage_timezone";
    pub const EXPORT_OFFSET_SUFFIX: &str = "export_offset_suffix";

    // 异常检测
    pub const SCAN_LENGTH_THRESHOLD: &str = "scan_length_threshold";
    pub const LENGTH_BAND_MIN: &str = "length_band_min";
    pub const LENGTH_BAND_MAX: &str = "length_band_max";
    pub const DASH_MARKER: &str = "dash_marker";

    // 界面
    pub const LOCALE: &str = "locale";

    pub const ALL: [&str; 10] = [
        SHEET_NAME,
        HEADER_ROW_INDEX,
        DISPLAY_TIMEZONE,
        STORAGE_TIMEZONE,
        EXPORT_OFFSET_SUFFIX,
        SCAN_LENGTH_THRESHOLD,
        LENGTH_BAND_MIN,
        LENGTH_BAND_MAX,
        DASH_MARKER,
        LOCALE,
    ];

    /// 配置键的默认值文本
    pub fn default_value(key: &str) -> Option<&'static str> {
        match key {
            SHEET_NAME => Some(super::defaults::SHEET_NAME),
            HEADER_ROW_INDEX => Some("1"),
            DISPLAY_TIMEZONE => Some(super::defaults::DISPLAY_TIMEZONE),
            STORAGE_TIMEZONE => Some(super::defaults::STORAGE_TIMEZONE),
            EXPORT_OFFSET_SUFFIX => Some(super::defaults::EXPORT_OFFSET_SUFFIX),
            SCAN_LENGTH_THRESHOLD => Some("20"),
            LENGTH_BAND_MIN => Some("16"),
            LENGTH_BAND_MAX => Some("25"),
            DASH_MARKER => Some(super::defaults::DASH_MARKER),
            LOCALE => Some(super::defaults::LOCALE),
            _ => None,
        }
    }
}

pub mod defaults {
    pub const SHEET_NAME: &str = "RawData";
    pub const HEADER_ROW_INDEX: usize = 1;
    pub const DISPLAY_TIMEZONE: &str = "Africa/Lusaka";
    pub const STORAGE_TIMEZONE: &str = "UTC";
    pub const EXPORT_OFFSET_SUFFIX: &str = "+02:00";
    pub const SCAN_LENGTH_THRESHOLD: usize = 20;
    pub const LENGTH_BAND_MIN: usize = 16;
    pub const LENGTH_BAND_MAX: usize = 25;
    pub const DASH_MARKER: &str = "-";
    pub const LOCALE: &str = "en";
}
