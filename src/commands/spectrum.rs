//! # spectrum 子命令实现
//!
//! 从 TDDFT 日志提取单重态激发根，生成 Lorentzian 展宽光谱并导出。
//!
//! ## 依赖关系
//! - 使用 `cli/spectrum.rs` 定义的 SpectrumArgs
//! - 使用 `parsers/` 提取 TDDFT 根
//! - 使用 `spectrum/` 展宽与导出

use crate::cli::spectrum::{SpectrumArgs, SpectrumFormat};
use crate::error::{NwlogError, Result};
use crate::models::{ExcitationRoot, Multiplicity};
use crate::parsers;
use crate::spectrum::export;
use crate::utils::output;

use std::path::Path;

/// hc，单位 eV·nm
const EV_NM: f64 = 1239.841984;

/// 执行 spectrum 子命令
pub fn execute(args: SpectrumArgs) -> Result<()> {
    output::print_header("TDDFT Excitation Spectrum");

    let doc = parsers::parse_log_file(&args.input)?;
    let singlets = doc.tddft.get(Multiplicity::Singlet);

    if singlets.is_empty() {
        return Err(NwlogError::NoRoots {
            multiplicity: Multiplicity::Singlet.to_string(),
            path: args.input.display().to_string(),
        });
    }

    output::print_success(&format!(
        "Found {} singlet and {} triplet roots",
        singlets.len(),
        doc.tddft.get(Multiplicity::Triplet).len()
    ));
    print_root_table(singlets, args.top);

    let settings = args.settings();
    output::print_info(&format!(
        "Lorentzian broadening: width = {:.3} eV, {} points",
        settings.width, settings.npoints
    ));

    let spectrum = doc.excitation_spectrum(&settings)?;
    if spectrum.is_empty() {
        output::print_warning("No root carries an oscillator strength, spectrum is empty");
    } else if let Some((energy, intensity)) = spectrum.max_point() {
        output::print_info(&format!(
            "Strongest band at {:.4} eV (intensity {:.4e})",
            energy, intensity
        ));
    }

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));

    match format {
        SpectrumFormat::Csv => export::to_csv(&spectrum, &args.output)?,
        SpectrumFormat::Xy => {
            let source = args
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("nwchem");
            export::to_xy(&spectrum, source, settings.width, &args.output)?
        }
    }
    output::print_success(&format!(
        "Spectrum ({}) saved to '{}'",
        format,
        args.output.display()
    ));

    if let Some(path) = &args.roots_csv {
        export::roots_to_csv(singlets, path)?;
        output::print_success(&format!("Roots saved to '{}'", path.display()));
    }

    Ok(())
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SpectrumFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("xy") | Some("dat") | Some("txt") => SpectrumFormat::Xy,
        _ => SpectrumFormat::Csv,
    }
}

/// 打印激发根表格
fn print_root_table(roots: &[ExcitationRoot], count: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct RootRow {
        #[tabled(rename = "Root")]
        index: usize,
        #[tabled(rename = "E (eV)")]
        energy: String,
        #[tabled(rename = "λ (nm)")]
        wavelength: String,
        #[tabled(rename = "f")]
        osc_strength: String,
    }

    let rows: Vec<RootRow> = roots
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, root)| RootRow {
            index: i + 1,
            energy: format!("{:.4}", root.energy),
            wavelength: if root.energy > 0.0 {
                format!("{:.1}", EV_NM / root.energy)
            } else {
                "-".to_string()
            },
            osc_strength: root
                .osc_strength
                .map(|f| format!("{:.5}", f))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("First {} Singlet Roots", rows.len()));
        println!("{}", Table::new(&rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_format_from_extension() {
        assert_eq!(guess_format_from_extension(Path::new("uv.xy")), SpectrumFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("uv.DAT")), SpectrumFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("uv.csv")), SpectrumFormat::Csv);
        assert_eq!(guess_format_from_extension(Path::new("uv")), SpectrumFormat::Csv);
    }

    #[test]
    fn test_log_without_roots_is_rejected() {
        let path = std::env::temp_dir().join("nwlog_spectrum_cmd_noroots.nwout");
        std::fs::write(&path, " Total DFT energy = -1.0\n").unwrap();

        let args = SpectrumArgs {
            input: path.clone(),
            output: std::env::temp_dir().join("nwlog_spectrum_cmd_unused.csv"),
            format: None,
            width: 0.1,
            npoints: 100,
            top: 5,
            roots_csv: None,
        };
        let result = execute(args);
        assert!(matches!(result, Err(NwlogError::NoRoots { .. })));

        let _ = std::fs::remove_file(&path);
    }
}
