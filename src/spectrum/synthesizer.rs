//! # Lorentzian 展宽
//!
//! 把离散的激发态根（能量, 振子强度）展宽为均匀网格上的连续曲线。
//!
//! ## 算法
//! 1. 网格范围：[min(E) - 20w, max(E) + 20w]，共 npoints 个点，步长 de
//! 2. 有效宽度 w' = max(w, 2·de)，避免展宽小于网格分辨率导致锯齿
//! 3. 每个网格点 x：y = γ/π·de · Σ f / ((x - E)² + γ²)，γ = w'/2，
//!    仅累加 |x - E| ≤ 20w' 的根（截断的 Lorentzian）
//!
//! ## 依赖关系
//! - 被 `models/output.rs` 和 `commands/spectrum.rs` 使用
//! - 使用 `models/excitation.rs`

use crate::error::{NwlogError, Result};
use crate::models::{ExcitationRoot, ExcitationSpectrum};

use std::f64::consts::PI;

/// 网格两端的留白和截断半径，均以展宽宽度为单位
const PADDING_WIDTHS: f64 = 20.0;

/// 展宽参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSettings {
    /// 展宽宽度 (eV)
    pub width: f64,

    /// 网格点数，越多曲线越平滑
    pub npoints: usize,
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        SpectrumSettings {
            width: 0.1,
            npoints: 2000,
        }
    }
}

/// 生成展宽光谱
///
/// 没有振子强度的根不参与展宽；没有可用的根时返回空光谱。
pub fn synthesize(roots: &[ExcitationRoot], settings: &SpectrumSettings) -> Result<ExcitationSpectrum> {
    if settings.npoints < 2 {
        return Err(NwlogError::InvalidArgument(format!(
            "npoints must be at least 2, got {}",
            settings.npoints
        )));
    }
    if settings.width.is_nan() || settings.width <= 0.0 {
        return Err(NwlogError::InvalidArgument(format!(
            "broadening width must be positive, got {}",
            settings.width
        )));
    }

    let lines: Vec<(f64, f64)> = roots
        .iter()
        .filter_map(|root| root.osc_strength.map(|f| (root.energy, f)))
        .collect();

    if lines.is_empty() {
        return Ok(ExcitationSpectrum::default());
    }

    let e_min = lines.iter().map(|(e, _)| *e).fold(f64::INFINITY, f64::min);
    let e_max = lines.iter().map(|(e, _)| *e).fold(f64::NEG_INFINITY, f64::max);

    let padding = PADDING_WIDTHS * settings.width;
    let grid_min = e_min - padding;
    let grid_max = e_max + padding;
    let step = (grid_max - grid_min) / settings.npoints as f64;

    let width = settings.width.max(2.0 * step);
    let cutoff = PADDING_WIDTHS * width;
    let gamma = 0.5 * width;
    let gamma_sq = gamma * gamma;
    let prefactor = gamma / PI * step;

    let x: Vec<f64> = (0..settings.npoints)
        .map(|i| grid_min + i as f64 * step)
        .collect();

    let y = x
        .iter()
        .map(|&energy| {
            let total: f64 = lines
                .iter()
                .map(|&(center, strength)| (energy - center, strength))
                .filter(|(delta, _)| delta.abs() <= cutoff)
                .map(|(delta, strength)| strength / (delta * delta + gamma_sq))
                .sum();
            total * prefactor
        })
        .collect();

    Ok(ExcitationSpectrum { x, y })
}
