//! # 激发光谱模块
//!
//! 由 TDDFT 根生成 Lorentzian 展宽光谱并导出。
//!
//! ## 子模块
//! - `synthesizer`: 展宽计算
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `models/output.rs` 和 `commands/spectrum.rs` 使用
//! - 使用 `models/excitation.rs`

pub mod export;
pub mod synthesizer;

pub use synthesizer::{synthesize, SpectrumSettings};
