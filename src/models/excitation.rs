//! # TDDFT 激发态数据模型
//!
//! ## 依赖关系
//! - 被 `parsers/tddft.rs` 和 `spectrum/` 使用

use serde::{Deserialize, Serialize};

/// 激发态自旋多重度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    #[default]
    Singlet,
    Triplet,
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Multiplicity::Singlet => write!(f, "singlet"),
            Multiplicity::Triplet => write!(f, "triplet"),
        }
    }
}

/// 单个激发态根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationRoot {
    /// 激发能 (eV)
    pub energy: f64,

    /// 偶极振子强度，读到 "Dipole Oscillator Strength" 行之前为 None
    pub osc_strength: Option<f64>,
}

impl ExcitationRoot {
    pub fn new(energy: f64) -> Self {
        ExcitationRoot {
            energy,
            osc_strength: None,
        }
    }

    pub fn with_osc_strength(mut self, osc_strength: f64) -> Self {
        self.osc_strength = Some(osc_strength);
        self
    }
}

/// 按多重度分组的 TDDFT 根
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TddftRoots {
    pub singlet: Vec<ExcitationRoot>,
    pub triplet: Vec<ExcitationRoot>,
}

impl TddftRoots {
    pub fn get(&self, multiplicity: Multiplicity) -> &[ExcitationRoot] {
        match multiplicity {
            Multiplicity::Singlet => &self.singlet,
            Multiplicity::Triplet => &self.triplet,
        }
    }

    pub fn get_mut(&mut self, multiplicity: Multiplicity) -> &mut Vec<ExcitationRoot> {
        match multiplicity {
            Multiplicity::Singlet => &mut self.singlet,
            Multiplicity::Triplet => &mut self.triplet,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.singlet.is_empty() && self.triplet.is_empty()
    }
}

/// 展宽后的激发光谱（均匀能量网格上的采样）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcitationSpectrum {
    /// 能量网格 (eV)，严格递增
    pub x: Vec<f64>,

    /// 展宽强度
    pub y: Vec<f64>,
}

impl ExcitationSpectrum {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// 成对迭代 (x, y)
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// 强度最大的采样点
    pub fn max_point(&self) -> Option<(f64, f64)> {
        self.points()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}
