//! # 分子与周期结构数据模型
//!
//! NWChem 几何块中的原子坐标均为笛卡尔坐标 (Å)。
//! 没有晶格向量时得到分子，有 `a1=< >` 等晶格行时得到周期结构。
//!
//! ## 依赖关系
//! - 被 `parsers/job.rs` 和 `models/output.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a1, a2, a3
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 从逐行收集的晶格向量创建，行数不为 3 时返回 None
    pub fn from_rows(rows: &[[f64; 3]]) -> Option<Self> {
        match rows {
            [a, b, c] => Some(Lattice::from_vectors([*a, *b, *c])),
            _ => None,
        }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有向）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(&a, &cross(&b, &c))
    }

    /// 笛卡尔坐标转分数坐标，晶格退化时返回 None
    pub fn to_fractional(&self, cart: &[f64; 3]) -> Option<[f64; 3]> {
        let [a, b, c] = self.matrix;
        let volume = self.volume();
        if volume.abs() < 1e-12 {
            return None;
        }

        // r = f · M  =>  f = r · M⁻¹，M⁻¹ 的列为倒格矢 / V
        let b_cross_c = cross(&b, &c);
        let c_cross_a = cross(&c, &a);
        let a_cross_b = cross(&a, &b);

        Some([
            dot(cart, &b_cross_c) / volume,
            dot(cart, &c_cross_a) / volume,
            dot(cart, &a_cross_b) / volume,
        ])
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号（首字母大写）
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 分子（无周期性）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Molecule { atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        formula_of(&self.atoms)
    }
}

/// 周期结构，坐标保持为笛卡尔坐标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicStructure {
    pub lattice: Lattice,
    pub atoms: Vec<Atom>,
}

impl PeriodicStructure {
    pub fn new(lattice: Lattice, atoms: Vec<Atom>) -> Self {
        PeriodicStructure { lattice, atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn formula(&self) -> String {
        formula_of(&self.atoms)
    }

    /// 全部原子的分数坐标
    pub fn frac_coords(&self) -> Option<Vec<[f64; 3]>> {
        self.atoms
            .iter()
            .map(|atom| self.lattice.to_fractional(&atom.position))
            .collect()
    }
}

/// 按元素字母序拼接化学式
fn formula_of(atoms: &[Atom]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for atom in atoms {
        *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(el, count)| {
            if count == 1 {
                el.to_string()
            } else {
                format!("{}{}", el, count)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_from_rows() {
        let rows = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]];
        let lattice = Lattice::from_rows(&rows).unwrap();
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 4.0).abs() < 1e-6);
        assert!((b - 4.0).abs() < 1e-6);
        assert!((c - 4.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
        assert!((lattice.volume() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_lattice_from_rows_incomplete() {
        let rows = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0]];
        assert!(Lattice::from_rows(&rows).is_none());
    }

    #[test]
    fn test_fractional_coords() {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]]);
        let structure = PeriodicStructure::new(
            lattice,
            vec![Atom::new("Si", [0.0, 0.0, 0.0]), Atom::new("Si", [1.0, 1.0, 2.5])],
        );

        let frac = structure.frac_coords().unwrap();
        assert_eq!(frac.len(), 2);
        assert!((frac[1][0] - 0.5).abs() < 1e-12);
        assert!((frac[1][1] - 0.25).abs() < 1e-12);
        assert!((frac[1][2] - 0.5).abs() < 1e-12);
        assert_eq!(structure.formula(), "Si2");
    }

    #[test]
    fn test_molecule_formula() {
        let molecule = Molecule::new(vec![
            Atom::new("O", [0.0, 0.0, 0.0]),
            Atom::new("H", [0.0, 0.757, 0.587]),
            Atom::new("H", [0.0, -0.757, 0.587]),
        ]);

        assert_eq!(molecule.len(), 3);
        assert_eq!(molecule.formula(), "H2O");
    }
}
