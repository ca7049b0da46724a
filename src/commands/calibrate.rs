//! # calibrate 命令实现
//!
//! ANNNI vs DMLF 层错能比例标定。
//!
//! ## 功能
//! - 加载能量/层错能表和晶格常数表
//! - 计算 ANNNI 层错能并按层错类型拟合标定因子
//! - 写出对比 CSV（完整写出或不写）
//! - 终端打印逐行结果表和标定因子
//!
//! ## 依赖关系
//! - 使用 `cli/calibrate.rs` 定义的参数
//! - 使用 `annni/`
//! - 使用 `utils/output.rs`

use crate::annni::{self, export};
use crate::cli::calibrate::CalibrateArgs;
use crate::error::Result;
use crate::models::{CalibrationReport, FaultEstimate, FaultType};
use crate::parsers::calibrated::UNDEFINED;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 逐行结果表
#[derive(Debug, Clone, Tabled)]
struct ResultRow {
    #[tabled(rename = "Composition")]
    composition: String,
    #[tabled(rename = "T (K)")]
    temperature: i64,
    #[tabled(rename = "a (Å)")]
    lattice: String,
    #[tabled(rename = "ISF: ANNNI / scaled / %err")]
    isf: String,
    #[tabled(rename = "ESF: ANNNI / scaled / %err")]
    esf: String,
    #[tabled(rename = "Twin: ANNNI / scaled / %err")]
    twin: String,
}

/// 标定因子汇总表
#[derive(Debug, Clone, Tabled)]
struct FactorRow {
    #[tabled(rename = "Fault")]
    fault: String,
    #[tabled(rename = "Scale factor")]
    scale: String,
    #[tabled(rename = "Max |%Error|")]
    max_error: String,
}

/// 执行 calibrate 命令
pub fn execute(args: CalibrateArgs) -> Result<()> {
    output::print_header("ANNNI vs DMLF Calibration");

    let config = args.to_config();
    output::print_info(&format!(
        "Loading '{}' and '{}'",
        config.sfe_path.display(),
        config.lattice_path.display()
    ));
    output::print_info(&format!(
        "Targets: {} (lowest {} temperatures each)",
        config.targets.join(", "),
        config.temperatures_per_target
    ));

    // 拟合失败时这些警告仍需先于错误打印
    let prepared = annni::prepare(&config)?;
    for issue in &prepared.issues {
        output::print_warning(&issue.to_string());
    }

    let report = annni::calibrate(&prepared.joined)?;
    for issue in &report.issues {
        output::print_warning(&issue.to_string());
    }

    export::write_calibrated_csv(&report.rows, &config.output_path)?;
    output::print_success(&format!("Saved: {}", config.output_path.display()));

    if !args.quiet_table {
        output::print_header("ANNNI vs Scaled DMLF (mJ/m²)");
        println!("{}", Table::new(result_rows(&report)));
    }

    output::print_header("Per-fault Calibration Factors");
    println!("{}", Table::new(factor_rows(&report)));

    output::print_done(&format!(
        "Scale factors -> ISF: {:.6}, ESF: {:.6}, Twin: {:.6}",
        report.scale_factors.isf, report.scale_factors.esf, report.scale_factors.twin
    ));

    Ok(())
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => UNDEFINED.to_string(),
    }
}

fn fmt_estimate(estimate: &FaultEstimate) -> String {
    let err = match estimate.percent_error {
        Some(e) => format!("{:+.2}%", e),
        None => UNDEFINED.to_string(),
    };
    format!(
        "{} / {} / {}",
        fmt_value(estimate.analytical, 2),
        fmt_value(estimate.empirical_scaled, 2),
        err
    )
}

fn result_rows(report: &CalibrationReport) -> Vec<ResultRow> {
    report
        .rows
        .iter()
        .map(|r| ResultRow {
            composition: r.composition.clone(),
            temperature: r.temperature,
            lattice: fmt_value(r.lattice_angstrom, 4),
            isf: fmt_estimate(&r.faults.isf),
            esf: fmt_estimate(&r.faults.esf),
            twin: fmt_estimate(&r.faults.twin),
        })
        .collect()
}

fn factor_rows(report: &CalibrationReport) -> Vec<FactorRow> {
    FaultType::ALL
        .iter()
        .map(|&fault| FactorRow {
            fault: fault.to_string(),
            scale: format!("{:.6}", report.scale_factors.get(fault)),
            max_error: fmt_value(*report.max_abs_error.get(fault), 4),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::parsers::calibrated::load_calibrated_table;
    use clap::Parser;
    use std::fs;
    use std::path::Path;

    const SFE_HEADER: &str = "composition,T(K),E_fcc(eV/atom),E_hcp(eV/atom),E_dhcp(eV/atom),γ_ISF(mJ/m²),γ_ESF(mJ/m²),γ_Twin(mJ/m²)";

    fn calibrate_args(dir: &Path, extra: &[&str]) -> CalibrateArgs {
        let sfe = dir.join("SFE_all.csv");
        let lattice = dir.join("Lattice_all.csv");
        let out = dir.join("out.csv");
        let mut argv = vec![
            "sfetool".to_string(),
            "calibrate".to_string(),
            "--sfe".to_string(),
            sfe.display().to_string(),
            "--lattice".to_string(),
            lattice.display().to_string(),
            "--output".to_string(),
            out.display().to_string(),
            "--quiet-table".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Calibrate(a) => a,
            _ => panic!("expected calibrate"),
        }
    }

    #[test]
    fn test_pure_fe_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SFE_all.csv"),
            format!("{}\nCr0.00_Co0.00_Fe1.00,300,-4.10,-4.05,-4.08,30.0,20.0,10.0\n", SFE_HEADER),
        )
        .unwrap();
        fs::write(
            dir.path().join("Lattice_all.csv"),
            "composition,T(K),a_fcc(Å)\nCr0.00_Co0.00_Fe1.00,300,35.4\n",
        )
        .unwrap();

        execute(calibrate_args(dir.path(), &["-t", "Cr0.00_Co0.00_Fe1.00"])).unwrap();

        let rows = load_calibrated_table(&dir.path().join("out.csv")).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert!((r.lattice_angstrom.unwrap() - 3.54).abs() < 1e-12);
        assert!((r.faults.isf.analytical.unwrap() - 265.733).abs() < 1e-3);
        assert_eq!(r.faults.isf.empirical_raw, Some(30.0));
        for fault in FaultType::ALL {
            let e = r.faults.get(fault);
            assert!((e.empirical_scaled.unwrap() - e.analytical.unwrap()).abs() < 1e-9);
            assert!(e.percent_error.unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_fit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SFE_all.csv"),
            format!(
                "{}\nCr0.00_Co0.00_Fe1.00,100,-4.10,-4.05,-4.08,30.0,20.0,-1.0\nCr0.00_Co0.00_Fe1.00,200,-4.10,-4.05,-4.08,31.0,21.0,0.0\n",
                SFE_HEADER
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("Lattice_all.csv"),
            "composition,T(K),a_fcc(Å)\nCr0.00_Co0.00_Fe1.00,100,35.3\nCr0.00_Co0.00_Fe1.00,200,35.4\n",
        )
        .unwrap();

        let err = execute(calibrate_args(dir.path(), &[])).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SfeError::DegenerateFit {
                fault: FaultType::Twin
            }
        ));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_no_selected_rows_fails_fit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SFE_all.csv"),
            format!("{}\nCr0.00_Co0.00_Fe1.00,300,-4.10,-4.05,-4.08,30.0,20.0,10.0\n", SFE_HEADER),
        )
        .unwrap();
        fs::write(
            dir.path().join("Lattice_all.csv"),
            "composition,T(K),a_fcc(Å)\nCr0.00_Co0.00_Fe1.00,300,35.4\n",
        )
        .unwrap();

        let err = execute(calibrate_args(dir.path(), &["-t", "Cr0.50_Co0.25_Fe0.25"])).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SfeError::DegenerateFit {
                fault: FaultType::Isf
            }
        ));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_missing_lattice_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SFE_all.csv"), format!("{}\n", SFE_HEADER)).unwrap();

        let err = execute(calibrate_args(dir.path(), &[])).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SfeError::MissingInputFile { .. }
        ));
    }

    #[test]
    fn test_fmt_estimate_marks_undefined() {
        let e = FaultEstimate {
            analytical: None,
            empirical_raw: Some(1.0),
            empirical_scaled: Some(2.5),
            percent_error: None,
        };
        assert_eq!(fmt_estimate(&e), "undefined / 2.50 / undefined");
    }
}
