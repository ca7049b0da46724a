//! # calibrate 子命令 CLI 定义
//!
//! 读取能量/层错能表与晶格常数表，输出 ANNNI vs 标定后 DMLF 的对比表。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数转换为 `annni::CalibrationConfig` 传给 `commands/calibrate.rs`

use crate::annni::{config, CalibrationConfig};
use clap::Args;
use std::path::PathBuf;

/// calibrate 子命令参数
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Energy/SFE table (composition, T(K), E_fcc/E_hcp/E_dhcp, γ_ISF/γ_ESF/γ_Twin)
    #[arg(long, default_value = "SFE_all.csv", env = "SFETOOL_SFE_FILE")]
    pub sfe: PathBuf,

    /// Lattice table (composition, T(K), a_fcc(Å))
    #[arg(long, default_value = "Lattice_all.csv", env = "SFETOOL_LATTICE_FILE")]
    pub lattice: PathBuf,

    /// Output CSV for the calibrated comparison
    #[arg(short, long, default_value = "ANNNI_vs_DMLF_calibrated.csv")]
    pub output: PathBuf,

    /// Target composition (repeatable); defaults to the four study alloys
    #[arg(short, long = "target", value_name = "COMPOSITION")]
    pub targets: Vec<String>,

    /// Number of lowest temperatures kept per target composition
    #[arg(long, default_value_t = config::TEMPERATURES_PER_TARGET)]
    pub temperatures_per_target: usize,

    /// Divisor converting a_fcc from supercell length to Å
    #[arg(long, default_value_t = config::LATTICE_DIVISOR)]
    pub lattice_divisor: f64,

    /// Do not print the per-row summary table
    #[arg(long, default_value_t = false)]
    pub quiet_table: bool,
}

impl CalibrateArgs {
    /// 构造运行配置
    pub fn to_config(&self) -> CalibrationConfig {
        let defaults = CalibrationConfig::default();
        CalibrationConfig {
            sfe_path: self.sfe.clone(),
            lattice_path: self.lattice.clone(),
            output_path: self.output.clone(),
            targets: if self.targets.is_empty() {
                defaults.targets
            } else {
                self.targets.clone()
            },
            temperatures_per_target: self.temperatures_per_target,
            lattice_divisor: self.lattice_divisor,
        }
    }
}
