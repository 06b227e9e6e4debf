//! # nwlog - NWChem 输出日志解析工具
//!
//! ## 子命令
//! - `parse`    - 日志 -> JSON（单文件或目录批量）
//! - `summary`  - 每个作业的类型、原子数、能量、耗时与错误汇总
//! - `spectrum` - TDDFT 激发根 -> 展宽光谱 (CSV/XY)

use clap::Parser;
use nwlog::cli::Cli;
use nwlog::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
