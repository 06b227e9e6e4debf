//! # 数据模型模块
//!
//! 定义 NWChem 日志解码结果、结构与激发态数据模型，以及单位换算。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`spectrum/` 和 `commands/` 使用
//! - 子模块: structure, output, excitation, units

pub mod excitation;
pub mod output;
pub mod structure;
pub mod units;

pub use excitation::{ExcitationRoot, ExcitationSpectrum, Multiplicity, TddftRoots};
pub use output::{
    EnergyEntry, Hessian, JobRecord, LogDocument, ScalarValue, SolvatedEnergy, VibrationalMode,
};
pub use structure::{Atom, Lattice, Molecule, PeriodicStructure};
