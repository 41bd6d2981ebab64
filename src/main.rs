// ==========================================
// 仓库收货监督 - 命令行入口
// ==========================================
// 子命令: run（处理收货导出并写出结果）/ config（查看有效配置）
// ==========================================

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use receiving_supervision::config::{ConfigManager, PipelineSettings};
use receiving_supervision::domain::WindowRequest;
use receiving_supervision::engine::ReceivingPipeline;
use receiving_supervision::{exporter, i18n, logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Warehouse receiving supervision: bag ID reconstruction, exceptions and export", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a receiving export and write the filtered export CSV
    Run(RunArgs),
    /// Print the effective configuration as JSON
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input workbook (.xlsx/.xlsm/.xls/.ods) or CSV file
    #[arg(long, short)]
    input: PathBuf,

    /// Window start date (YYYY-MM-DD); defaults to the earliest Added Time
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// Window start time (HH:MM[:SS]); defaults to 00:00
    #[arg(long, value_parser = parse_time)]
    start_time: Option<NaiveTime>,

    /// Window end date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// Window end time (HH:MM[:SS]); defaults to now
    #[arg(long, value_parser = parse_time)]
    end_time: Option<NaiveTime>,

    /// Directory for the export file
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,

    /// Also write diagnostic CSVs and summary.json under <output-dir>/diagnostics
    #[arg(long)]
    diagnostics: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Summary language (en, zh-CN); overrides the configured locale
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| format!("invalid time '{}' (expected HH:MM[:SS]): {}", value, e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    match cli.command {
        Command::Run(args) => run(args),
        Command::Config(args) => {
            let config = ConfigManager::load(args.config.as_deref()).context("failed to load configuration")?;
            println!("{}", config.get_config_snapshot()?);
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = ConfigManager::load(args.config.as_deref()).context("failed to load configuration")?;
    let settings = PipelineSettings::from_reader(&config).context("invalid configuration")?;

    let locale = args.locale.clone().unwrap_or_else(|| settings.locale.clone());
    i18n::set_locale(&locale);

    let pipeline = ReceivingPipeline::new(settings);
    let request = WindowRequest::new(args.start_date, args.start_time, args.end_date, args.end_time);

    let report = pipeline
        .run_file(&args.input, &request)
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    let export_path = exporter::write_export_file(&args.output_dir, &report.window, &report.export)
        .context("failed to write export")?;

    for line in i18n::summary_lines(&report.summary, pipeline.settings()) {
        println!("{}", line);
    }
    let export_text = export_path.display().to_string();
    println!(
        "{}",
        i18n::t_with_args("summary.export_file", &[("path", export_text.as_str())])
    );

    if args.diagnostics {
        let dir = args.output_dir.join("diagnostics");
        exporter::write_diagnostics(&dir, &report).context("failed to write diagnostics")?;
        let dir_text = dir.display().to_string();
        println!(
            "{}",
            i18n::t_with_args("summary.diagnostics_dir", &[("path", dir_text.as_str())])
        );
    }

    info!(run_id = %report.run_id, "done");
    Ok(())
}
