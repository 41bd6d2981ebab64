// ==========================================
// 仓库收货监督 - 流水线编排器
// ==========================================
// 流程: 加载 → 袋号字段提取 → 规范袋号 → 异常检测
//                                  ↘ 时间窗口 → 导出映射
// 红线: 致命错误在写出任何结果前返回；行级问题只记录
// ==========================================

use crate::config::PipelineSettings;
use crate::domain::{EnrichedTable, PipelineReport, RowIssue, RunSummary, WindowRequest};
use crate::engine::{
    ExceptionDetector, IdentityResolver, SchemaMapper, TimeWindowFilter,
};
use crate::importer::error::ReceivingResult;
use crate::importer::{FieldExtractor, LoadOutcome, ReceivingLoader};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// ReceivingPipeline - 流水线编排器
// ==========================================
pub struct ReceivingPipeline {
    settings: PipelineSettings,
    loader: ReceivingLoader,
    extractor: FieldExtractor,
    resolver: IdentityResolver,
    detector: ExceptionDetector,
    window_filter: TimeWindowFilter,
    mapper: SchemaMapper,
}

impl Default for ReceivingPipeline {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}

impl ReceivingPipeline {
    /// 按参数快照组装各阶段组件
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            loader: ReceivingLoader::with_layout(settings.sheet_layout()),
            extractor: FieldExtractor::default(),
            resolver: IdentityResolver::new(settings.scan_length_threshold),
            detector: ExceptionDetector::new(
                settings.length_band.clone(),
                settings.dash_marker.clone(),
                settings.scan_length_threshold,
            ),
            window_filter: TimeWindowFilter::new(settings.display_tz, settings.storage_tz),
            mapper: SchemaMapper::new(settings.export_offset_suffix.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// 处理文件（窗口缺省值按当前时间补齐）
    pub fn run_file(&self, file_path: &Path, request: &WindowRequest) -> ReceivingResult<PipelineReport> {
        self.run_with_clock(file_path, request, Utc::now())
    }

    /// 处理文件（显式指定当前时间）
    #[instrument(skip(self, file_path, request, now), fields(run_id))]
    pub fn run_with_clock(
        &self,
        file_path: &Path,
        request: &WindowRequest,
        now: DateTime<Utc>,
    ) -> ReceivingResult<PipelineReport> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, file_path = %file_path.display(), "开始处理收货数据");

        let result = self
            .loader
            .load(file_path)
            .and_then(|loaded| {
                self.run_loaded(run_id.clone(), Some(file_path.display().to_string()), loaded, request, now)
            });

        result.map_err(|e| {
            error!(run_id = %run_id, error = %e, "收货数据处理失败");
            e
        })
    }

    /// 处理已加载的原始表
    pub fn run_loaded(
        &self,
        run_id: String,
        source_file: Option<String>,
        loaded: LoadOutcome,
        request: &WindowRequest,
        now: DateTime<Utc>,
    ) -> ReceivingResult<PipelineReport> {
        let start_time = Instant::now();

        // === 步骤 1: 袋号字段提取 ===
        debug!("步骤 1: 袋号字段提取");
        let extraction = self.extractor.enrich(loaded.table)?;
        let format_issues = loaded.issues.len();
        let parse_issues = extraction.issues.len();

        // === 步骤 2: 规范袋号 ===
        debug!("步骤 2: 规范袋号");
        let mut combined: EnrichedTable = extraction.table;
        self.resolver.resolve_table(&mut combined);
        combined.sort_by_added_time_desc();

        // === 步骤 3: 异常检测 ===
        debug!("步骤 3: 异常检测");
        let exceptions = self.detector.detect(&combined);

        // === 步骤 4: 时间窗口 ===
        debug!("步骤 4: 时间窗口过滤");
        let window = self
            .window_filter
            .resolve(request, combined.earliest_added_time(), now)?;
        let filtered = self.window_filter.filter(&combined, &window);
        let filtered_rows = filtered.len();

        // === 步骤 5: 导出映射 ===
        debug!("步骤 5: 导出映射");
        let export = self.mapper.map_records(filtered);

        let mut issues: Vec<RowIssue> = loaded.issues;
        issues.extend(extraction.issues);
        issues.sort_by_key(|issue| issue.row_number);

        let summary = RunSummary {
            run_id: run_id.clone(),
            source_file,
            combined_rows: combined.len(),
            duplicate_groups: exceptions.duplicates.len(),
            length_exceptions: exceptions.length_exceptions.len(),
            dash_exceptions: exceptions.dash_exceptions.len(),
            unresolved_identities: exceptions.unresolved_identities.len(),
            parse_issues,
            format_issues,
            filtered_rows,
            window_start: window.start_text(),
            window_end: window.end_text(),
            export_file_name: window.export_file_name(),
            elapsed_ms: start_time.elapsed().as_millis(),
            issues: issues.clone(),
        };

        info!(
            run_id = %run_id,
            combined_rows = summary.combined_rows,
            duplicate_groups = summary.duplicate_groups,
            filtered_rows = summary.filtered_rows,
            row_issues = issues.len(),
            elapsed_ms = summary.elapsed_ms,
            "收货数据处理完成"
        );

        Ok(PipelineReport {
            run_id,
            combined,
            exceptions,
            issues,
            window,
            export,
            summary,
        })
    }
}
