//! # plot 子命令 CLI 定义
//!
//! 绘图功能统一入口，包含多个子命令：
//! - `calibrated`: ANNNI vs 标定后 DMLF（读取 calibrate 的输出）
//! - `temperature`: DMLF 层错能随温度变化（读取能量/层错能表）
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// plot 主命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(subcommand)]
    pub command: PlotCommands,
}

/// plot 子命令
#[derive(Subcommand, Debug)]
pub enum PlotCommands {
    /// Plot ANNNI vs scaled DMLF energies for ISF, ESF and Twin
    Calibrated(CalibratedPlotArgs),

    /// Plot DMLF energies versus temperature for every composition
    Temperature(TemperaturePlotArgs),
}

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum PlotFormat {
    /// PNG image
    #[default]
    Png,
    /// SVG vector image
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// 各绘图子命令共用的输出参数
#[derive(Args, Debug, Clone)]
pub struct FigureArgs {
    /// Directory for the generated figures
    #[arg(short, long, default_value = "plots")]
    pub output_dir: PathBuf,

    /// Image format
    #[arg(short, long, value_enum, default_value = "png")]
    pub format: PlotFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

/// plot calibrated 参数
#[derive(Args, Debug)]
pub struct CalibratedPlotArgs {
    /// Calibrated comparison CSV written by `calibrate`
    #[arg(default_value = "ANNNI_vs_DMLF_calibrated.csv")]
    pub input: PathBuf,

    #[command(flatten)]
    pub figure: FigureArgs,
}

/// plot temperature 参数
#[derive(Args, Debug)]
pub struct TemperaturePlotArgs {
    /// Energy/SFE table
    #[arg(default_value = "SFE_all.csv")]
    pub input: PathBuf,

    #[command(flatten)]
    pub figure: FigureArgs,
}
