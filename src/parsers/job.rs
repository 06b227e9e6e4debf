//! # NWChem 作业块解码器
//!
//! 对单个作业块逐行扫描一次，得到 [`JobRecord`]。
//!
//! ## 扫描规则
//! 每一行依次经过：
//! 1. 错误特征检查（总是执行，命中即追加提示性标签）
//! 2. 计时检查（仅在读到总能量行之后才生效，命中一次即解除）
//! 3. 当前活动块（几何、基组摘要、频率、Hessian、力表）之一处理该行；
//!    没有活动块时按单行触发器处理（能量、校正、作业类型、块标题等）
//!
//! 格式异常的行直接跳过，不中断扫描，尽量保留已读到的数据。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/output.rs`, `models/structure.rs`, `models/units.rs`
//! - 使用 `parsers/numeric.rs`

use crate::models::units::{hartree_to_ev, kj_per_mol_to_ev_per_atom};
use crate::models::{
    Atom, EnergyEntry, Hessian, JobRecord, Lattice, Molecule, PeriodicStructure, ScalarValue,
    SolvatedEnergy, VibrationalMode,
};
use crate::parsers::numeric::{
    into_triples, is_label_token, parse_floats, parse_fortran_floats,
};

use regex::{Captures, Regex};
use std::sync::LazyLock;

// ─────────────────────────────────────────────────────────────
// 行模式
// ─────────────────────────────────────────────────────────────

static ENERGY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total \w+ energy\s+=\s+([.\-\d]+)").unwrap());

static GAS_ENERGY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gas phase energy\s+=\s+([.\-\d]+)").unwrap());

static SOL_ENERGY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sol phase energy\s+=\s+([.\-\d]+)").unwrap());

static COORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s+(\w+)\s+[.\-\d]+\s+([.\-\d]+)\s+([.\-\d]+)\s+([.\-\d]+)").unwrap()
});

static LATTICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"a[123]=<\s+([.\-\d]+)\s+([.\-\d]+)\s+([.\-\d]+)\s+>").unwrap()
});

static CORRECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w\-]+ correction to \w+)\s+=\s+([.\-\d]+)").unwrap()
});

static SCALAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(No\. of atoms|No\. of electrons|SCF calculation type|Charge|Spin multiplicity)\s*:\s*(\S+)",
    )
    .unwrap()
});

static FORCE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"atom\s+coordinates\s+gradient").unwrap());

static FORCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\s+(\d+)\s+(\w+){}", r"\s+([0-9.\-]+)".repeat(6))).unwrap()
});

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+Task\s+times\s+cpu:\s+([.\d]+)s.+").unwrap());

// ─────────────────────────────────────────────────────────────
// 固定标记
// ─────────────────────────────────────────────────────────────

/// 已知失败特征 -> 错误标签
pub const ERROR_SIGNATURES: &[(&str, &str)] = &[
    ("calculations not reaching convergence", "Bad convergence"),
    ("Calculation failed to converge", "Bad convergence"),
    ("geom_binvr: #indep variables incorrect", "autoz error"),
    ("dft optimize failed", "Geometry optimization failed"),
];

pub const INCOMPLETE_HESSIAN: &str = "Incomplete hessian";
pub const ORPHAN_PROJECTED_HESSIAN: &str = "Projected hessian without nuclear hessian";
pub const INCOMPLETE_LATTICE: &str = "Incomplete lattice";

const GEOMETRY_HEADER: &str = "Geometry \"geometry\"";
const GEOMETRY_END: &str = "Atomic Mass";
const BASIS_HEADER: &str = "Summary of \"ao basis\"";
const BASIS_TAG: &str = "Tag";
const PROJECTED_FREQUENCY_HEADER: &str = "P.Frequency";
const FREQUENCY_HEADER: &str = "Frequency";
const HESSIAN_HEADER: &str = "MASS-WEIGHTED NUCLEAR HESSIAN";
const PROJECTED_HESSIAN_HEADER: &str = "MASS-WEIGHTED PROJECTED HESSIAN";
const HESSIAN_END: &str = "----------";
const MODULE_PREFIX: &str = "NWChem";
const DFT_MODULE: &str = "NWChem DFT Module";
const COSMO_MARKER: &str = "COSMO solvation results";

/// 基组摘要表头中被丢弃的列（"Functions and Types" 中的 "and"）
const BASIS_DROPPED_COLUMN: usize = 4;

// ─────────────────────────────────────────────────────────────
// 解码状态
// ─────────────────────────────────────────────────────────────

/// 当前正在读取的多行块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ActiveBlock {
    #[default]
    Idle,
    Geometry,
    BasisSummary,
    NormalFrequencies,
    ProjectedFrequencies,
    Hessian,
    ProjectedHessian,
    Forces,
}

/// 读取中的振动模式，位移按标量逐个到达
#[derive(Debug, Clone)]
struct PendingMode {
    frequency: f64,
    values: Vec<f64>,
}

impl PendingMode {
    fn finish(self) -> VibrationalMode {
        VibrationalMode {
            frequency: self.frequency,
            displacements: into_triples(&self.values),
        }
    }
}

/// 几何块累加器
#[derive(Debug, Default)]
struct GeometryAccumulator {
    atoms: Vec<Atom>,
    lattice: Vec<[f64; 3]>,
}

/// 作业块解码器，只在一次解码调用内部存活
struct JobDecoder {
    record: JobRecord,
    block: ActiveBlock,
    cosmo_run: bool,

    /// 读到总能量后等待下一条计时行
    expect_timing: bool,
    /// 最近追加的能量记录
    last_energy: Option<usize>,

    geometry: GeometryAccumulator,
    basis_header: Vec<String>,
    frequencies: Option<Vec<PendingMode>>,
    normal_frequencies: Option<Vec<PendingMode>>,
    hessian: Option<Hessian>,
    projected_hessian: Option<Hessian>,
    pending_forces: Vec<f64>,
}

/// 解码单个作业块
pub fn parse_job(chunk: &str) -> JobRecord {
    let mut decoder = JobDecoder::new(chunk.contains(COSMO_MARKER));
    for line in chunk.lines() {
        decoder.feed(line);
    }
    decoder.finish()
}

impl JobDecoder {
    fn new(cosmo_run: bool) -> Self {
        JobDecoder {
            record: JobRecord::default(),
            block: ActiveBlock::Idle,
            cosmo_run,
            expect_timing: false,
            last_energy: None,
            geometry: GeometryAccumulator::default(),
            basis_header: Vec::new(),
            frequencies: None,
            normal_frequencies: None,
            hessian: None,
            projected_hessian: None,
            pending_forces: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        self.check_error_signatures(line);
        self.check_timing(line);

        match self.block {
            ActiveBlock::Idle => self.scan_idle(line),
            ActiveBlock::Geometry => self.scan_geometry(line),
            ActiveBlock::BasisSummary => self.scan_basis(line),
            ActiveBlock::NormalFrequencies | ActiveBlock::ProjectedFrequencies => {
                self.scan_frequencies(line)
            }
            ActiveBlock::Hessian => self.scan_hessian(line),
            ActiveBlock::ProjectedHessian => self.scan_projected_hessian(line),
            ActiveBlock::Forces => self.scan_forces(line),
        }
    }

    fn check_error_signatures(&mut self, line: &str) {
        for (signature, tag) in ERROR_SIGNATURES {
            if line.contains(signature) {
                self.record.errors.push(tag.to_string());
            }
        }
    }

    fn check_timing(&mut self, line: &str) {
        if !self.expect_timing {
            return;
        }
        if let Some(seconds) = TIME_RE.captures(line).and_then(|c| float_at(&c, 1)) {
            self.record.task_time_seconds = seconds;
            self.expect_timing = false;
        }
    }

    // ─────────────────────────────────────────────────────────
    // 单行触发器
    // ─────────────────────────────────────────────────────────

    fn scan_idle(&mut self, line: &str) {
        if let Some(hartree) = ENERGY_RE.captures(line).and_then(|c| float_at(&c, 1)) {
            self.record
                .energies
                .push(EnergyEntry::Scalar(hartree_to_ev(hartree)));
            self.last_energy = Some(self.record.energies.len() - 1);
            self.expect_timing = true;
            return;
        }

        if let Some(hartree) = GAS_ENERGY_RE.captures(line).and_then(|c| float_at(&c, 1)) {
            self.solvate_last_energy(hartree_to_ev(hartree));
        }

        if let Some(hartree) = SOL_ENERGY_RE.captures(line).and_then(|c| float_at(&c, 1)) {
            self.attach_sol_phase(hartree_to_ev(hartree));
        }

        if let Some(caps) = SCALAR_RE.captures(line) {
            let key = caps[1]
                .replace("No. of ", "n")
                .replace(' ', "_")
                .to_lowercase();
            self.record
                .scalar_fields
                .insert(key, ScalarValue::parse(&caps[2]));
        } else if line.contains(GEOMETRY_HEADER) {
            self.block = ActiveBlock::Geometry;
        } else if line.contains(BASIS_HEADER) {
            self.block = ActiveBlock::BasisSummary;
        } else if line.contains(PROJECTED_FREQUENCY_HEADER) {
            self.open_modes(line, true);
        } else if is_frequency_header(line) {
            self.open_modes(line, false);
        } else if line.contains(HESSIAN_HEADER) {
            self.hessian.get_or_insert_with(Vec::new);
            self.block = ActiveBlock::Hessian;
        } else if line.contains(PROJECTED_HESSIAN_HEADER) {
            if self.hessian.as_ref().is_some_and(|h| !h.is_empty()) {
                self.projected_hessian.get_or_insert_with(Vec::new);
                self.block = ActiveBlock::ProjectedHessian;
            } else {
                self.record.errors.push(ORPHAN_PROJECTED_HESSIAN.to_string());
            }
        } else if FORCE_HEADER_RE.is_match(line) {
            self.block = ActiveBlock::Forces;
        } else if self.record.job_type.is_empty() && line.trim().starts_with(MODULE_PREFIX) {
            let mut job_type = line.trim().to_string();
            if job_type == DFT_MODULE && self.cosmo_run {
                job_type.push_str(" COSMO");
            }
            self.record.job_type = job_type;
        } else if let Some(caps) = CORRECTION_RE.captures(line) {
            if let Some(kj_per_mol) = float_at(&caps, 2) {
                self.record
                    .corrections
                    .insert(caps[1].to_string(), kj_per_mol_to_ev_per_atom(kj_per_mol));
            }
        }
    }

    /// 把最近一条标量能量改写为溶剂化形式
    fn solvate_last_energy(&mut self, gas_phase: f64) {
        let Some(entry) = self.last_energy.and_then(|i| self.record.energies.get_mut(i)) else {
            return;
        };
        if let EnergyEntry::Scalar(cosmo_scf) = *entry {
            *entry = EnergyEntry::Solvated(SolvatedEnergy {
                cosmo_scf,
                gas_phase,
                sol_phase: None,
            });
        }
    }

    fn attach_sol_phase(&mut self, sol_phase: f64) {
        if let Some(EnergyEntry::Solvated(solvated)) = self
            .last_energy
            .and_then(|i| self.record.energies.get_mut(i))
        {
            solvated.sol_phase = Some(sol_phase);
        }
    }

    // ─────────────────────────────────────────────────────────
    // 几何块
    // ─────────────────────────────────────────────────────────

    fn scan_geometry(&mut self, line: &str) {
        if line.trim() == GEOMETRY_END {
            self.finish_geometry();
            self.block = ActiveBlock::Idle;
            return;
        }

        if let Some(caps) = COORD_RE.captures(line) {
            if let Some(position) = triple_at(&caps, 2) {
                self.geometry
                    .atoms
                    .push(Atom::new(capitalize(&caps[1]), position));
            }
        }

        if let Some(row) = LATTICE_RE.captures(line).and_then(|c| triple_at(&c, 1)) {
            self.geometry.lattice.push(row);
        }
    }

    fn finish_geometry(&mut self) {
        let GeometryAccumulator { atoms, lattice } = std::mem::take(&mut self.geometry);

        // 晶格行不足三行时退化为分子并记录错误
        match Lattice::from_rows(&lattice) {
            Some(lattice) => self
                .record
                .structures
                .push(PeriodicStructure::new(lattice, atoms)),
            None => {
                if !lattice.is_empty() {
                    self.record.errors.push(INCOMPLETE_LATTICE.to_string());
                }
                self.record.molecules.push(Molecule::new(atoms));
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // 基组摘要
    // ─────────────────────────────────────────────────────────

    fn scan_basis(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            self.block = ActiveBlock::Idle;
            return;
        };

        if first == BASIS_TAG {
            let mut header: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
            if header.len() > BASIS_DROPPED_COLUMN {
                header.remove(BASIS_DROPPED_COLUMN);
            }
            self.basis_header = header;
        } else if !first.starts_with('-') {
            let fields = self
                .basis_header
                .iter()
                .skip(1)
                .zip(tokens.iter().skip(1))
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect();
            self.record.basis_set.insert(first.to_string(), fields);
        }
    }

    // ─────────────────────────────────────────────────────────
    // 振动频率
    // ─────────────────────────────────────────────────────────

    /// 标题行上的每个频率值开启一个新模式
    fn open_modes(&mut self, line: &str, projected: bool) {
        let Some(values) = parse_floats(line.split_whitespace().skip(1)) else {
            return;
        };

        let (modes, block) = if projected {
            (&mut self.frequencies, ActiveBlock::ProjectedFrequencies)
        } else {
            (&mut self.normal_frequencies, ActiveBlock::NormalFrequencies)
        };

        modes
            .get_or_insert_with(Vec::new)
            .extend(values.into_iter().map(|frequency| PendingMode {
                frequency,
                values: Vec::new(),
            }));
        self.block = block;
    }

    fn scan_frequencies(&mut self, line: &str) {
        let modes = match self.block {
            ActiveBlock::ProjectedFrequencies => self.frequencies.get_or_insert_with(Vec::new),
            _ => self.normal_frequencies.get_or_insert_with(Vec::new),
        };

        if line.trim().is_empty() {
            // 标题行与数据之间常有一个空行
            if modes.last().is_some_and(|m| m.values.is_empty()) {
                return;
            }
            self.block = ActiveBlock::Idle;
            return;
        }

        let Some(values) = parse_floats(line.split_whitespace().skip(1)) else {
            return;
        };

        // 同一打印块内并排的列对应最近开启的若干模式
        let start = modes.len().saturating_sub(values.len());
        for (mode, value) in modes[start..].iter_mut().zip(values) {
            mode.values.push(value);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Hessian
    // ─────────────────────────────────────────────────────────

    fn scan_hessian(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        let rows = self.hessian.get_or_insert_with(Vec::new);
        if !rows.is_empty() && line.contains(HESSIAN_END) {
            self.block = ActiveBlock::Idle;
            return;
        }

        if let Some((row, values)) = parse_hessian_row(line) {
            accumulate_row(rows, row, values);
        }
    }

    fn scan_projected_hessian(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        let dimension = self.hessian.as_ref().map_or(0, Vec::len);
        let rows = self.projected_hessian.get_or_insert_with(Vec::new);

        if let Some((row, values)) = parse_hessian_row(line) {
            // 投影 Hessian 后面没有分隔线，最后一行读满即结束
            if accumulate_row(rows, row, values).is_some_and(|len| len == dimension) {
                self.block = ActiveBlock::Idle;
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // 力表
    // ─────────────────────────────────────────────────────────

    fn scan_forces(&mut self, line: &str) {
        if let Some(caps) = FORCE_RE.captures(line) {
            if let Some(gradient) = triple_at(&caps, 6) {
                self.pending_forces.extend(gradient);
            }
        } else if !self.pending_forces.is_empty() {
            self.flush_forces();
            self.block = ActiveBlock::Idle;
        }
    }

    fn flush_forces(&mut self) {
        let forces = std::mem::take(&mut self.pending_forces);
        self.record.forces.push(forces);
    }

    // ─────────────────────────────────────────────────────────
    // 收尾
    // ─────────────────────────────────────────────────────────

    fn finish(mut self) -> JobRecord {
        if !self.pending_forces.is_empty() {
            self.flush_forces();
        }

        self.record.frequencies = self
            .frequencies
            .take()
            .map(|modes| modes.into_iter().map(PendingMode::finish).collect());
        self.record.normal_frequencies = self
            .normal_frequencies
            .take()
            .map(|modes| modes.into_iter().map(PendingMode::finish).collect());

        let hessian = self.hessian.take();
        self.record.hessian = self.finish_hessian(hessian);
        let projected = self.projected_hessian.take();
        self.record.projected_hessian = self.finish_hessian(projected);

        self.record.has_error = !self.record.errors.is_empty();
        self.record
    }

    /// 由下三角补全对称矩阵；下三角不完整时保留原始行并记录错误
    fn finish_hessian(&mut self, rows: Option<Hessian>) -> Option<Hessian> {
        let rows = rows?;
        if rows.is_empty() {
            return Some(rows);
        }
        match symmetrize(&rows) {
            Some(full) => Some(full),
            None => {
                self.record.errors.push(INCOMPLETE_HESSIAN.to_string());
                Some(rows)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 辅助函数
// ─────────────────────────────────────────────────────────────

fn is_frequency_header(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    tokens.next() == Some(FREQUENCY_HEADER) && tokens.next().is_some()
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn float_at(caps: &Captures, index: usize) -> Option<f64> {
    caps.get(index)?.as_str().parse().ok()
}

fn triple_at(caps: &Captures, first: usize) -> Option<[f64; 3]> {
    Some([
        float_at(caps, first)?,
        float_at(caps, first + 1)?,
        float_at(caps, first + 2)?,
    ])
}

/// 解析 Hessian 数据行：`<行号> <值> <值> ...`
///
/// 第二个记号不含小数点的是列号标签行，返回 None。
fn parse_hessian_row(line: &str) -> Option<(usize, Vec<f64>)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let row: usize = tokens[0].parse().ok()?;
    if row == 0 || is_label_token(tokens[1]) {
        return None;
    }
    let values = parse_fortran_floats(tokens[1..].iter().copied())?;
    Some((row, values))
}

/// 把一段列追加到指定行（1 起始），返回该行当前长度
///
/// 宽矩阵分多个列块打印，同一行号会多次出现。
fn accumulate_row(rows: &mut Hessian, row: usize, values: Vec<f64>) -> Option<usize> {
    if rows.len() < row {
        rows.push(values);
        rows.last().map(Vec::len)
    } else {
        let target = &mut rows[row - 1];
        target.extend(values);
        Some(target.len())
    }
}

/// 用下三角（含对角）补全上三角
fn symmetrize(rows: &Hessian) -> Option<Hessian> {
    let n = rows.len();
    if rows.iter().enumerate().any(|(i, row)| row.len() < i + 1) {
        return None;
    }

    Some(
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if j <= i { rows[i][j] } else { rows[j][i] })
                    .collect()
            })
            .collect(),
    )
}
