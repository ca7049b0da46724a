//! # plot 命令实现
//!
//! 层错能随温度变化的图表：
//! - `calibrated`: 每种层错一张图，ANNNI（实线）与标定后 DMLF（圆点）
//! - `temperature`: 每种层错一张图，各成分的 DMLF 层错能
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `parsers/`, `plot/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::plot::{
    CalibratedPlotArgs, FigureArgs, PlotArgs, PlotCommands, PlotFormat, TemperaturePlotArgs,
};
use crate::error::{Result, SfeError};
use crate::models::FaultType;
use crate::parsers::{calibrated, sfe_table};
use crate::plot::{self, ChartSpec, Series};
use crate::utils::{output, progress};

use std::fs;
use std::path::PathBuf;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    match args.command {
        PlotCommands::Calibrated(a) => execute_calibrated(a),
        PlotCommands::Temperature(a) => execute_temperature(a),
    }
}

fn execute_calibrated(args: CalibratedPlotArgs) -> Result<()> {
    output::print_header("ANNNI vs Scaled DMLF");
    output::print_info(&format!("Reading '{}'", args.input.display()));

    let rows = calibrated::load_calibrated_table(&args.input)?;
    output::print_info(&format!("Loaded {} calibrated rows", rows.len()));

    render_all(&args.figure, |fault| {
        let spec = ChartSpec {
            title: format!("{}: ANNNI vs Scaled DMLF", fault.long_name()),
            x_desc: "Temperature (K)".to_string(),
            y_desc: "γ (mJ/m²)".to_string(),
            width: args.figure.width,
            height: args.figure.height,
        };
        let name = format!("{}_ANNNI_vs_scaledDMLF", fault.label());
        (plot::calibrated_series(&rows, fault), spec, name)
    })
}

fn execute_temperature(args: TemperaturePlotArgs) -> Result<()> {
    output::print_header("Stacking-Fault Energy vs Temperature");
    output::print_info(&format!("Reading '{}'", args.input.display()));

    let records = sfe_table::load_sfe_table(&args.input)?;
    output::print_info(&format!("Loaded {} records", records.len()));

    render_all(&args.figure, |fault| {
        let spec = ChartSpec {
            title: format!("Variation of {} ({}) with Temperature", fault.long_name(), fault),
            x_desc: "Temperature (K)".to_string(),
            y_desc: format!("γ_{} (mJ/m²)", fault),
            width: args.figure.width,
            height: args.figure.height,
        };
        let name = format!("{}_vs_temp", fault.label());
        (plot::temperature_series(&records, fault), spec, name)
    })
}

/// 为三种层错各渲染一张图
fn render_all<F>(figure: &FigureArgs, mut build: F) -> Result<()>
where
    F: FnMut(FaultType) -> (Vec<Series>, ChartSpec, String),
{
    fs::create_dir_all(&figure.output_dir).map_err(|e| SfeError::FileWriteError {
        path: figure.output_dir.display().to_string(),
        source: e,
    })?;

    let use_svg = figure.format == PlotFormat::Svg;
    let pb = progress::create_progress_bar(FaultType::ALL.len() as u64, "Rendering");

    let mut written: Vec<PathBuf> = Vec::new();
    for fault in FaultType::ALL {
        let (series, spec, name) = build(fault);
        pb.inc(1);

        if series.is_empty() {
            pb.suspend(|| output::print_skip(&format!("{}: no data", fault)));
            continue;
        }

        let path = figure
            .output_dir
            .join(format!("{}.{}", name, figure.format.extension()));
        plot::render_chart(&series, &spec, &path, use_svg)?;
        written.push(path);
    }

    pb.finish_and_clear();

    for path in &written {
        output::print_success(&format!("Saved: {}", path.display()));
    }
    output::print_done(&format!(
        "{} figure(s) written to '{}'",
        written.len(),
        figure.output_dir.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn plot_args(argv: &[&str]) -> PlotArgs {
        match Cli::parse_from(argv).command {
            Commands::Plot(a) => a,
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn test_parse_plot_arguments() {
        let args = plot_args(&["sfetool", "plot", "calibrated", "--format", "svg", "-o", "figs"]);
        match args.command {
            PlotCommands::Calibrated(a) => {
                assert_eq!(a.input, PathBuf::from("ANNNI_vs_DMLF_calibrated.csv"));
                assert_eq!(a.figure.format.extension(), "svg");
                assert_eq!(a.figure.output_dir, PathBuf::from("figs"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("SFE_all.csv");
        let out = dir.path().join("plots");
        let args = plot_args(&[
            "sfetool",
            "plot",
            "temperature",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);

        assert!(matches!(
            execute(args).unwrap_err(),
            SfeError::MissingInputFile { .. }
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_empty_table_writes_no_figures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("calibrated.csv");
        fs::write(&input, format!("{}\n", calibrated::header().join(","))).unwrap();
        let out = dir.path().join("plots");

        let args = plot_args(&[
            "sfetool",
            "plot",
            "calibrated",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        execute(args).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }
}
