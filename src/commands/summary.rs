//! # summary 子命令实现
//!
//! 汇总一个或多个日志中每个作业的关键信息。
//!
//! ## 功能
//! - 单文件或目录输入，目录并行解析
//! - 终端表格（tabled）：文件、序号、作业类型、原子数、晶胞边长、最终能量、CPU 时间、错误
//! - 可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/summary.rs` 定义的 SummaryArgs
//! - 使用 `batch/` 收集并并行解析
//! - 使用 `csv` 导出

use crate::batch::{BatchRunner, FileCollector};
use crate::cli::summary::SummaryArgs;
use crate::error::{NwlogError, Result};
use crate::models::LogDocument;
use crate::parsers;
use crate::utils::output;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表中的一行（一个作业）
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct JobRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Job type")]
    pub job_type: String,
    #[tabled(rename = "Atoms")]
    pub natoms: String,
    #[tabled(rename = "Cell a/b/c (Å)")]
    pub cell: String,
    #[tabled(rename = "Final energy (eV)")]
    pub final_energy: String,
    #[tabled(rename = "CPU (s)")]
    pub cpu_time: String,
    #[tabled(rename = "Errors")]
    pub errors: String,
}

/// 执行 summary 子命令
pub fn execute(args: SummaryArgs) -> Result<()> {
    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive);

    let files = collector.collect()?;
    if files.is_empty() {
        return Err(NwlogError::NoFilesFound {
            pattern: collector.pattern_display(),
        });
    }

    if !collector.is_single_file() {
        output::print_info(&format!("Found {} log files", files.len()));
    }

    let runner = BatchRunner::new(args.jobs);
    let parsed = runner.map(&files, |file| parsers::parse_log_file(file))?;

    let mut rows = Vec::new();
    let mut failed = 0;
    for (path, result) in parsed {
        match result {
            Ok(doc) => {
                if doc.is_empty() {
                    output::print_warning(&format!("No jobs found in '{}'", path.display()));
                }
                rows.extend(job_rows(&display_name(&path, &args.input), &doc));
            }
            Err(e) => {
                failed += 1;
                output::print_error(&format!("{}: {}", path.display(), e));
            }
        }
    }

    if !rows.is_empty() {
        output::print_header(&format!("Summary of {} jobs", rows.len()));
        println!("{}", Table::new(&rows));
    }

    if let Some(csv_path) = &args.csv {
        write_csv(&rows, csv_path)?;
        output::print_success(&format!("Summary saved to '{}'", csv_path.display()));
    }

    let with_errors = rows.iter().filter(|r| !r.errors.is_empty()).count();
    if with_errors > 0 {
        output::print_warning(&format!("{} jobs reported errors", with_errors));
    }
    if failed > 0 {
        output::print_warning(&format!("{} files could not be read", failed));
    }

    Ok(())
}

/// 把一个日志文档展开为汇总行
pub fn job_rows(file: &str, doc: &LogDocument) -> Vec<JobRow> {
    doc.iter()
        .enumerate()
        .map(|(i, job)| JobRow {
            file: file.to_string(),
            index: i + 1,
            job_type: job.job_type.clone(),
            natoms: job
                .natoms()
                .or_else(|| job.final_geometry_len())
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            cell: job
                .structures
                .last()
                .map(|s| {
                    let (a, b, c, _, _, _) = s.lattice.parameters();
                    format!("{:.3}/{:.3}/{:.3}", a, b, c)
                })
                .unwrap_or_else(|| "-".to_string()),
            final_energy: job
                .final_energy()
                .map(|e| format!("{:.6}", e))
                .unwrap_or_else(|| "-".to_string()),
            cpu_time: format!("{:.1}", job.task_time_seconds),
            errors: job.errors.join("; "),
        })
        .collect()
}

/// 目录模式下显示相对路径
fn display_name(path: &Path, input: &Path) -> String {
    path.strip_prefix(input)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

fn write_csv(rows: &[JobRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| NwlogError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
