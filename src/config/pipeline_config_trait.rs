// ==========================================
// 仓库收货监督 - 流水线配置读取 Trait
// ==========================================
// 职责: 定义流水线所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ReceivingResult;
use chrono_tz::Tz;
use std::ops::RangeInclusive;

// ==========================================
// PipelineConfigReader Trait
// ==========================================
// 用途: 加载、异常检测、时间窗口、导出所需的配置读取接口
// 实现者: ConfigManager（JSON 文件 + 环境变量覆写）
pub trait PipelineConfigReader: Send + Sync {
    // ===== 加载配置 =====

    /// 目标工作表名
    ///
    /// # 默认值
    /// - RawData
    fn get_sheet_name(&self) -> ReceivingResult<String>;

    /// 表头所在物理行（0 起）
    ///
    /// # 默认值
    /// - 1（第二行；第一行为横幅）
    fn get_header_row_index(&self) -> ReceivingResult<usize>;

    // ===== 时区配置 =====

    /// 窗口参数与过滤比较所用时区
    ///
    /// # 默认值
    /// - Africa/Lusaka
    fn get_display_timezone(&self) -> ReceivingResult<Tz>;

    /// 源表时间戳的存储时区
    ///
    /// # 默认值
    /// - UTC
    fn get_storage_timezone(&self) -> ReceivingResult<Tz>;

    /// 导出时间列的固定偏移后缀（与显示时区相互独立）
    ///
    /// # 默认值
    /// - +02:00
    fn get_export_offset_suffix(&self) -> ReceivingResult<String>;

    // ===== 异常检测配置 =====

    /// 扫码串长度阈值（字符数，严格大于视为扫码）
    ///
    /// # 默认值
    /// - 20
    fn get_scan_length_threshold(&self) -> ReceivingResult<usize>;

    /// 可疑长度区间（闭区间）
    ///
    /// # 默认值
    /// - 16..=25
    fn get_length_band(&self) -> ReceivingResult<RangeInclusive<usize>>;

    /// 规范袋号中不允许出现的标记
    ///
    /// # 默认值
    /// - "-"
    fn get_dash_marker(&self) -> ReceivingResult<String>;

    // ===== 界面配置 =====

    /// 汇总输出语言
    ///
    /// # 默认值
    /// - en
    fn get_locale(&self) -> ReceivingResult<String>;
}
