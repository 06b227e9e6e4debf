//! # TDDFT 激发态根提取
//!
//! 扫描整个日志（不按作业切分），收集收敛后打印的激发能与振子强度：
//!
//! ```text
//!   Convergence criterion met
//!   ...
//!   NWChem TDDFT Module ... singlet excited states
//!   Root   1 singlet a              0.294221372 a.u.                8.0062 eV
//!      Dipole Oscillator Strength                         0.01418
//!   ...
//!   Excited state energy =     -76.123
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/excitation.rs`, `parsers/numeric.rs`

use crate::models::{ExcitationRoot, Multiplicity, TddftRoots};
use crate::parsers::numeric::parse_fortran_float;

const START_TAG: &str = "Convergence criterion met";
const END_TAG: &str = "Excited state energy";
const SINGLET_TAG: &str = "singlet excited";
const TRIPLET_TAG: &str = "triplet excited";
const ROOT_TAG: &str = "Root";
const ENERGY_UNIT: &str = "eV";
const OSCILLATOR_TAG: &str = "Dipole Oscillator Strength";

/// 提取所有 TDDFT 根，按多重度分组
pub fn parse_tddft_roots(content: &str) -> TddftRoots {
    let mut roots = TddftRoots::default();
    let mut multiplicity = Multiplicity::Singlet;
    let mut inside = false;

    for line in content.lines() {
        let line = line.trim();

        if line.contains(START_TAG) {
            inside = true;
        } else if line.contains(END_TAG) {
            inside = false;
        } else if line.contains(SINGLET_TAG) {
            multiplicity = Multiplicity::Singlet;
        } else if line.contains(TRIPLET_TAG) {
            multiplicity = Multiplicity::Triplet;
        } else if inside && line.contains(ROOT_TAG) && line.contains(ENERGY_UNIT) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let energy = tokens
                .len()
                .checked_sub(2)
                .and_then(|i| parse_fortran_float(tokens[i]));
            if let Some(energy) = energy {
                roots.get_mut(multiplicity).push(ExcitationRoot::new(energy));
            }
        } else if inside && line.contains(OSCILLATOR_TAG) {
            let strength = line
                .split_whitespace()
                .last()
                .and_then(parse_fortran_float);
            if let (Some(strength), Some(root)) =
                (strength, roots.get_mut(multiplicity).last_mut())
            {
                root.osc_strength = Some(strength);
            }
        }
    }

    roots
}
