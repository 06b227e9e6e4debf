//! # 光谱数据导出
//!
//! 导出展宽光谱和离散激发态根。
//!
//! ## 支持格式
//! - CSV: `energy_eV,intensity`（展宽曲线），或 `root,energy_eV,osc_strength`（离散根）
//! - XY: 带 `#` 注释头的两列文本（能量, 强度）
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs` 调用
//! - 使用 `models/excitation.rs` 的 ExcitationSpectrum / ExcitationRoot
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{NwlogError, Result};
use crate::models::{ExcitationRoot, ExcitationSpectrum};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn write_error(output_path: &Path, source: std::io::Error) -> NwlogError {
    NwlogError::FileWriteError {
        path: output_path.display().to_string(),
        source,
    }
}

/// 导出展宽光谱为 CSV 格式
pub fn to_csv(spectrum: &ExcitationSpectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["energy_eV", "intensity"])?;

    for (energy, intensity) in spectrum.points() {
        wtr.write_record(&[format!("{:.6}", energy), format!("{:.6e}", intensity)])?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

/// 导出离散激发态根为 CSV 格式，缺失的振子强度留空
pub fn roots_to_csv(roots: &[ExcitationRoot], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["root", "energy_eV", "osc_strength"])?;

    for (i, root) in roots.iter().enumerate() {
        wtr.write_record(&[
            (i + 1).to_string(),
            format!("{:.4}", root.energy),
            root.osc_strength
                .map(|f| format!("{:.5}", f))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

/// 导出展宽光谱为 XY 格式
pub fn to_xy(
    spectrum: &ExcitationSpectrum,
    source_name: &str,
    width: f64,
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut out = BufWriter::new(file);

    let header = format!(
        "# Excitation spectrum: {}\n# Lorentzian width: {:.4} eV\n# Columns: energy (eV), intensity\n#",
        source_name, width
    );
    writeln!(out, "{}", header).map_err(|e| write_error(output_path, e))?;

    for (energy, intensity) in spectrum.points() {
        writeln!(out, "{:.6}\t{:.6e}", energy, intensity)
            .map_err(|e| write_error(output_path, e))?;
    }

    out.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> ExcitationSpectrum {
        ExcitationSpectrum {
            x: vec![1.0, 1.5, 2.0],
            y: vec![0.0, 0.25, 0.0],
        }
    }

    #[test]
    fn test_to_csv() {
        let path = std::env::temp_dir().join("nwlog_spectrum_test.csv");
        to_csv(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "energy_eV,intensity");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1.500000,"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_roots_to_csv_leaves_missing_strength_blank() {
        let path = std::env::temp_dir().join("nwlog_roots_test.csv");
        let roots = vec![
            ExcitationRoot::new(2.5).with_osc_strength(0.3),
            ExcitationRoot::new(3.0),
        ];
        roots_to_csv(&roots, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "1,2.5000,0.30000");
        assert_eq!(lines[2], "2,3.0000,");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_to_xy() {
        let path = std::env::temp_dir().join("nwlog_spectrum_test.xy");
        to_xy(&sample(), "water.nwout", 0.1, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert!(content.starts_with("# Excitation spectrum: water.nwout"));
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].split('\t').count(), 2);

        let _ = fs::remove_file(&path);
    }
}
