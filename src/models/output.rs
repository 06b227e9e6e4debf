//! # NWChem 输出数据模型
//!
//! 一个日志解码为 [`LogDocument`]：前导信息 + 按顺序排列的作业记录。
//! 所有能量统一为 eV。
//!
//! ## 依赖关系
//! - 被 `parsers/` 构造
//! - 被 `commands/` 和 `spectrum/` 读取
//! - 使用 `models/structure.rs`, `models/excitation.rs`

use crate::error::Result;
use crate::models::excitation::{ExcitationSpectrum, Multiplicity, TddftRoots};
use crate::models::structure::{Molecule, PeriodicStructure};
use crate::spectrum::{self, SpectrumSettings};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 质量加权 Hessian（方阵，按行存储）
pub type Hessian = Vec<Vec<f64>>;

/// 作业标量字段的取值：能解析为整数时保存整数，否则保存原文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Text(String),
}

impl ScalarValue {
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(v) => ScalarValue::Int(v),
            Err(_) => ScalarValue::Text(token.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(v) => Some(*v),
            ScalarValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 溶剂化 (COSMO) 计算的三分量能量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvatedEnergy {
    #[serde(rename = "cosmo scf")]
    pub cosmo_scf: f64,

    #[serde(rename = "gas phase")]
    pub gas_phase: f64,

    #[serde(rename = "sol phase", skip_serializing_if = "Option::is_none", default)]
    pub sol_phase: Option<f64>,
}

/// 单条能量记录 (eV)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyEntry {
    Scalar(f64),
    Solvated(SolvatedEnergy),
}

impl EnergyEntry {
    /// 代表值：标量本身，或溶剂化记录中的 "cosmo scf" 分量
    pub fn value(&self) -> f64 {
        match self {
            EnergyEntry::Scalar(v) => *v,
            EnergyEntry::Solvated(s) => s.cosmo_scf,
        }
    }
}

/// 振动模式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationalMode {
    /// 频率 (cm⁻¹)
    pub frequency: f64,

    /// 每个原子的 (x, y, z) 位移，顺序与原子声明顺序一致
    pub displacements: Vec<[f64; 3]>,
}

/// 单个作业的解码结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// 作业类型，如 "NWChem DFT Module"
    pub job_type: String,

    /// natoms, nelectrons, scf_calculation_type, charge, spin_multiplicity
    pub scalar_fields: BTreeMap<String, ScalarValue>,

    pub energies: Vec<EnergyEntry>,

    /// 各类校正 (eV/atom)
    pub corrections: BTreeMap<String, f64>,

    pub molecules: Vec<Molecule>,

    pub structures: Vec<PeriodicStructure>,

    /// 元素 -> {description, shells, functions, types, ...}
    pub basis_set: BTreeMap<String, BTreeMap<String, String>>,

    /// 投影后的振动频率
    pub frequencies: Option<Vec<VibrationalMode>>,

    pub normal_frequencies: Option<Vec<VibrationalMode>>,

    pub hessian: Option<Hessian>,

    pub projected_hessian: Option<Hessian>,

    /// 每张力表一行，按原子顺序展开的梯度分量
    pub forces: Vec<Vec<f64>>,

    /// 提示性错误标签，不影响其他字段
    pub errors: Vec<String>,

    pub has_error: bool,

    /// 任务 CPU 时间 (s)
    pub task_time_seconds: f64,
}

impl JobRecord {
    /// 原子数（来自 "No. of atoms" 行）
    pub fn natoms(&self) -> Option<usize> {
        self.scalar_fields
            .get("natoms")
            .and_then(ScalarValue::as_int)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// 最后一条能量记录的代表值 (eV)
    pub fn final_energy(&self) -> Option<f64> {
        self.energies.last().map(EnergyEntry::value)
    }

    /// 最后一个几何结构中的原子数
    pub fn final_geometry_len(&self) -> Option<usize> {
        self.molecules
            .last()
            .map(Molecule::len)
            .or_else(|| self.structures.last().map(PeriodicStructure::len))
    }
}

/// 完整日志的解码结果，构造后只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    /// 前导部分的 key = value 信息
    pub preamble: BTreeMap<String, String>,

    pub jobs: Vec<JobRecord>,

    /// 整个日志中的 TDDFT 根，与作业边界无关
    pub tddft: TddftRoots,
}

impl LogDocument {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JobRecord> {
        self.jobs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRecord> {
        self.jobs.iter()
    }

    /// 任一作业含有错误标签
    pub fn has_error(&self) -> bool {
        self.jobs.iter().any(|job| job.has_error)
    }

    /// 由单重态根生成展宽激发光谱
    pub fn excitation_spectrum(&self, settings: &SpectrumSettings) -> Result<ExcitationSpectrum> {
        spectrum::synthesize(self.tddft.get(Multiplicity::Singlet), settings)
    }
}

impl<'a> IntoIterator for &'a LogDocument {
    type Item = &'a JobRecord;
    type IntoIter = std::slice::Iter<'a, JobRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
