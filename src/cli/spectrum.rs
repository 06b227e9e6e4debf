//! # spectrum 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/spectrum.rs`

use crate::spectrum::SpectrumSettings;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 光谱输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumFormat {
    /// CSV data file (energy_eV, intensity)
    Csv,
    /// XY data file with comment header
    Xy,
}

impl std::fmt::Display for SpectrumFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumFormat::Csv => write!(f, "csv"),
            SpectrumFormat::Xy => write!(f, "xy"),
        }
    }
}

/// spectrum 子命令参数
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Input: NWChem log file containing TDDFT output
    pub input: PathBuf,

    /// Output file for the broadened spectrum
    #[arg(short, long, default_value = "spectrum.csv")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SpectrumFormat>,

    /// Lorentzian broadening width in eV
    #[arg(short, long, default_value_t = 0.1)]
    pub width: f64,

    /// Number of grid points of the sampled spectrum
    #[arg(short, long, default_value_t = 2000)]
    pub npoints: usize,

    /// Number of roots to list in the terminal table
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Also write the discrete roots to this CSV file
    #[arg(long)]
    pub roots_csv: Option<PathBuf>,
}

impl SpectrumArgs {
    /// 展宽参数
    pub fn settings(&self) -> SpectrumSettings {
        SpectrumSettings {
            width: self.width,
            npoints: self.npoints,
        }
    }
}
