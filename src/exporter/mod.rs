// ==========================================
// 仓库收货监督 - 导出层
// ==========================================
// 职责: 导出 CSV、诊断 CSV、运行汇总 JSON
// ==========================================

pub mod csv_writer;

pub use csv_writer::{
    diagnostic_path, write_combined, write_diagnostics, write_duplicates, write_exception_rows,
    write_export, write_export_file, COMBINED_FILE_NAME, SUMMARY_FILE_NAME,
};
