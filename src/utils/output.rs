//! # 美化输出工具
//!
//! 提供统一的终端输出样式。状态消息一律写到 stderr，
//! stdout 留给 `parse` 输出的 JSON 和表格。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `main.rs` 使用
//! - 使用 `batch/runner.rs` 的 BatchResult
//! - 使用 `colored` crate

use crate::batch::BatchResult;

use colored::Colorize;

/// 批量报告中最多列出的失败文件数
const MAX_LISTED_FAILURES: usize = 10;

/// 打印成功消息
pub fn print_success(msg: &str) {
    eprintln!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    eprintln!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    eprintln!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    eprintln!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印转换成功消息（日志 -> JSON）
pub fn print_conversion(from: &str, to: &str) {
    eprintln!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    eprintln!("\n{}", line.dimmed());
    eprintln!("  {}", title.bold());
    eprintln!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    eprintln!("{}", "─".repeat(60).dimmed());
}

/// 打印作业的诊断标签
pub fn print_job_errors(source: &str, index: usize, errors: &[String]) {
    for err in errors {
        eprintln!(
            "{} {} job #{}: {}",
            "[WARN]".yellow().bold(),
            source.dimmed(),
            index,
            err
        );
    }
}

/// 打印批量解析的统计与失败列表
pub fn print_batch_report(result: &BatchResult) {
    print_separator();
    print_done(&format!(
        "Batch complete: {} of {} logs parsed, {} skipped, {} failed",
        result.success,
        result.total(),
        result.skipped,
        result.failed
    ));

    if result.failures.is_empty() {
        return;
    }

    print_warning("Failed logs:");
    for (path, err) in result.failures.iter().take(MAX_LISTED_FAILURES) {
        print_error(&format!("  {}: {}", path, err));
    }
    if result.failures.len() > MAX_LISTED_FAILURES {
        print_warning(&format!(
            "  ... and {} more",
            result.failures.len() - MAX_LISTED_FAILURES
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ProcessResult;

    #[test]
    fn test_print_batch_report_with_many_failures() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("ok.nwout".to_string()));
        for i in 0..12 {
            result.merge(ProcessResult::Failed(
                format!("bad{}.nwout", i),
                "unreadable".to_string(),
            ));
        }

        print_batch_report(&result);
        assert_eq!(result.total(), 13);
        assert_eq!(result.failures.len(), 12);
    }

    #[test]
    fn test_print_job_errors_accepts_empty_list() {
        print_job_errors("water.nwout", 0, &[]);
    }
}
