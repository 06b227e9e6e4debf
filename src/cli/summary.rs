//! # summary 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/summary.rs`

use crate::batch::DEFAULT_LOG_PATTERN;

use clap::Args;
use std::path::PathBuf;

/// summary 子命令参数
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Input: NWChem log file or directory containing logs
    pub input: PathBuf,

    /// Also write the summary table to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Glob pattern for input files (batch mode, e.g., "*.nwout,*.out")
    #[arg(long, default_value = DEFAULT_LOG_PATTERN)]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0, env = "NWLOG_JOBS")]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}
