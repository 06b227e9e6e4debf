//! # nwlog - NWChem 输出日志解析库
//!
//! 把 NWChem 的文本输出日志解码为结构化记录：前导信息、按作业切分的
//! 能量/几何/基组/频率/Hessian/受力/诊断，以及 TDDFT 激发根和展宽光谱。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── parsers/    (日志切分与逐行解码)
//!   ├── models/     (数据模型与单位换算)
//!   ├── spectrum/   (Lorentzian 展宽与导出)
//!   ├── batch/      (文件收集与并行执行)
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── utils/      (终端输出与进度条)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod parsers;
pub mod spectrum;
pub mod utils;

pub use error::{NwlogError, Result};
pub use models::{ExcitationRoot, ExcitationSpectrum, JobRecord, LogDocument, TddftRoots};
pub use parsers::{parse_log_content, parse_log_file, parse_tddft_roots};
pub use spectrum::{synthesize, SpectrumSettings};
