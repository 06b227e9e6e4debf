//! # 单位换算
//!
//! NWChem 输出的能量多为 Hartree 或 kJ/mol，解析器统一换算为 eV。
//!
//! ## 依赖关系
//! - 被 `parsers/job.rs` 使用
//! - 无外部模块依赖

/// 1 Hartree 对应的 eV（CODATA 2018）
pub const HARTREE_TO_EV: f64 = 27.211386245988;

/// 阿伏伽德罗常数 (mol⁻¹)
pub const AVOGADRO: f64 = 6.02214076e23;

/// 元电荷 (C)，即 1 eV 对应的焦耳数
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;

/// 1 kJ/mol 对应的 eV/atom
pub const KJ_PER_MOL_TO_EV_PER_ATOM: f64 = 1000.0 / (AVOGADRO * ELEMENTARY_CHARGE);

/// Hartree -> eV
pub fn hartree_to_ev(value: f64) -> f64 {
    value * HARTREE_TO_EV
}

/// kJ/mol -> eV/atom
pub fn kj_per_mol_to_ev_per_atom(value: f64) -> f64 {
    value * KJ_PER_MOL_TO_EV_PER_ATOM
}
