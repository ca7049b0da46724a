//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `calibrate`: ANNNI 与 DMLF 层错能比例标定
//! - `plot`: 绘图（嵌套子命令）
//!   - `calibrated`: ANNNI vs 标定后 DMLF
//!   - `temperature`: DMLF 层错能随温度变化
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: calibrate, plot

pub mod calibrate;
pub mod plot;

use clap::{Parser, Subcommand};

/// sfetool - CrCoFe 合金层错能标定工具
#[derive(Parser)]
#[command(name = "sfetool")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Stacking-fault energy calibration toolkit for CrCoFe alloys", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Calibrate DMLF stacking-fault energies against the ANNNI model
    Calibrate(calibrate::CalibrateArgs),

    /// Plot stacking-fault energies versus temperature
    Plot(plot::PlotArgs),
}
