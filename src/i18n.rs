// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::config::PipelineSettings;
use crate::domain::RunSummary;

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（不支持的语言回退到 en）
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale = locale, "不支持的语言，使用 en");
        rust_i18n::set_locale("en");
    }
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use receiving_supervision::i18n::t_with_args;
/// let msg = t_with_args("summary.filtered_rows", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 按当前语言渲染运行汇总
pub fn summary_lines(summary: &RunSummary, settings: &PipelineSettings) -> Vec<String> {
    let tr = |key: &str, args: &[(&str, String)]| {
        let borrowed: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
        t_with_args(key, &borrowed)
    };

    let mut lines = vec![tr("summary.title", &[("run_id", summary.run_id.clone())])];
    if let Some(path) = &summary.source_file {
        lines.push(tr("summary.source_file", &[("path", path.clone())]));
    }

    lines.push(tr(
        "summary.combined_rows",
        &[("count", summary.combined_rows.to_string())],
    ));
    lines.push(tr(
        "summary.duplicate_groups",
        &[("count", summary.duplicate_groups.to_string())],
    ));
    lines.push(tr(
        "summary.length_exceptions",
        &[
            ("min", settings.length_band.start().to_string()),
            ("max", settings.length_band.end().to_string()),
            ("count", summary.length_exceptions.to_string()),
        ],
    ));
    lines.push(tr(
        "summary.dash_exceptions",
        &[
            ("marker", settings.dash_marker.clone()),
            ("count", summary.dash_exceptions.to_string()),
        ],
    ));
    lines.push(tr(
        "summary.unresolved_identities",
        &[("count", summary.unresolved_identities.to_string())],
    ));
    lines.push(tr(
        "summary.row_issues",
        &[
            ("parse", summary.parse_issues.to_string()),
            ("format", summary.format_issues.to_string()),
        ],
    ));
    lines.push(tr(
        "summary.window",
        &[
            ("start", summary.window_start.clone()),
            ("end", summary.window_end.clone()),
        ],
    ));
    lines.push(tr(
        "summary.filtered_rows",
        &[("count", summary.filtered_rows.to_string())],
    ));
    lines
}
