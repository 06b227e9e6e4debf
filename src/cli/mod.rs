//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `parse`: 解析日志为 JSON
//! - `summary`: 作业汇总表
//! - `spectrum`: TDDFT 激发光谱
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: parse, summary, spectrum

pub mod parse;
pub mod spectrum;
pub mod summary;

use clap::{Parser, Subcommand};

/// nwlog - NWChem 输出日志解析工具
#[derive(Parser)]
#[command(name = "nwlog")]
#[command(version)]
#[command(about = "Parse NWChem output logs into structured records", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Parse NWChem logs into JSON documents
    Parse(parse::ParseArgs),

    /// Print a per-job summary table of one or more logs
    Summary(summary::SummaryArgs),

    /// Build a broadened excitation spectrum from TDDFT roots
    Spectrum(spectrum::SpectrumArgs),
}
