//! # parse 子命令实现
//!
//! 把 NWChem 日志解析为 JSON 文档。
//!
//! ## 功能
//! - 单文件：JSON 写到 stdout 或 `--output`
//! - 目录：每个日志输出一个 `<stem>.json`，并行处理
//! - 作业中识别到的错误以警告形式报告，不中断解析
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的 ParseArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/` 解码日志

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::parse::ParseArgs;
use crate::error::{NwlogError, Result};
use crate::models::LogDocument;
use crate::parsers;
use crate::utils::output;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 执行 parse 子命令
pub fn execute(args: ParseArgs) -> Result<()> {
    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(NwlogError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &ParseArgs) -> Result<()> {
    let doc = parsers::parse_log_file(&args.input)?;
    let source = args.input.display().to_string();
    report_job_errors(&source, &doc);

    let json = to_json(&doc, args.compact)?;

    match &args.output {
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).map_err(|e| NwlogError::FileWriteError {
                path: "<stdout>".to_string(),
                source: e,
            })?;
        }
        Some(path) => {
            if path.exists() && !args.overwrite {
                output::print_skip(&format!(
                    "Output exists, use --overwrite to replace: {}",
                    path.display()
                ));
                return Ok(());
            }
            write_json(&json, path)?;
            output::print_conversion(&source, &path.display().to_string());
        }
    }

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &ParseArgs) -> Result<()> {
    output::print_header("NWChem Log Parsing");
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive);

    let files = collector.collect()?;

    if files.is_empty() {
        return Err(NwlogError::NoFilesFound {
            pattern: collector.pattern_display(),
        });
    }

    output::print_info(&format!("Found {} log files", files.len()));

    let output_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir).map_err(|e| NwlogError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(&files, |file| {
        process_batch_file(file, &output_dir, args.compact, args.overwrite)
    })?;

    output::print_batch_report(&result);

    Ok(())
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    input: &PathBuf,
    output_dir: &Path,
    compact: bool,
    overwrite: bool,
) -> ProcessResult {
    let output_file = output_dir.join(format!("{}.json", log_stem(input)));

    if output_file.exists() && !overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let written = parsers::parse_log_file(input)
        .and_then(|doc| to_json(&doc, compact))
        .and_then(|json| write_json(&json, &output_file));

    match written {
        Ok(()) => {
            ProcessResult::Success(format!("{} -> {}", input.display(), output_file.display()))
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 输出文件名主干，压缩日志先去掉 `.gz`
fn log_stem(input: &Path) -> &str {
    let path = if parsers::is_gzip(input) {
        input.file_stem().map(Path::new).unwrap_or(input)
    } else {
        input
    };
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
}

fn to_json(doc: &LogDocument, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(doc)?
    } else {
        serde_json::to_string_pretty(doc)?
    };
    Ok(json)
}

fn write_json(json: &str, path: &Path) -> Result<()> {
    fs::write(path, json).map_err(|e| NwlogError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn report_job_errors(source: &str, doc: &LogDocument) {
    for (i, job) in doc.iter().enumerate() {
        output::print_job_errors(source, i, &job.errors);
    }
}
