//! # 标定配置
//!
//! 一次标定运行所需的全部参数：输入输出路径、目标成分列表、晶格常数换算因子。
//! eV/Å² -> mJ/m² 的换算常数是固定的，见 `annni/model.rs`。
//!
//! ## 依赖关系
//! - 由 `cli/calibrate.rs` 的参数构造
//! - 被 `annni/pipeline.rs` 使用

use crate::error::{Result, SfeError};
use std::path::PathBuf;

/// 默认的四个目标合金
pub const DEFAULT_TARGETS: [&str; 4] = [
    "Cr0.00_Co0.00_Fe1.00",
    "Cr0.33_Co0.33_Fe0.33",
    "Cr0.50_Co0.25_Fe0.25",
    "Cr0.67_Co0.17_Fe0.17",
];

/// LAMMPS 超胞边长 -> 单个 fcc 惯用胞晶格常数 (Å)
pub const LATTICE_DIVISOR: f64 = 10.0;

/// 每个目标成分保留的最低温度个数
pub const TEMPERATURES_PER_TARGET: usize = 3;

/// 成分分数之和偏离 1 的容差（标识符保留两位小数）
pub const COMPOSITION_TOLERANCE: f64 = 0.02;

/// 标定运行配置
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// 能量/层错能表
    pub sfe_path: PathBuf,
    /// 晶格常数表
    pub lattice_path: PathBuf,
    /// 输出 CSV
    pub output_path: PathBuf,
    /// 目标成分（按此顺序输出）
    pub targets: Vec<String>,
    pub temperatures_per_target: usize,
    pub lattice_divisor: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig {
            sfe_path: PathBuf::from("SFE_all.csv"),
            lattice_path: PathBuf::from("Lattice_all.csv"),
            output_path: PathBuf::from("ANNNI_vs_DMLF_calibrated.csv"),
            targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            temperatures_per_target: TEMPERATURES_PER_TARGET,
            lattice_divisor: LATTICE_DIVISOR,
        }
    }
}

impl CalibrationConfig {
    /// 检查参数是否可用
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(SfeError::InvalidArgument(
                "at least one target composition is required".to_string(),
            ));
        }
        if self.temperatures_per_target == 0 {
            return Err(SfeError::InvalidArgument(
                "temperatures per target must be at least 1".to_string(),
            ));
        }
        if !(self.lattice_divisor.is_finite() && self.lattice_divisor > 0.0) {
            return Err(SfeError::InvalidArgument(format!(
                "lattice divisor must be positive, got {}",
                self.lattice_divisor
            )));
        }
        Ok(())
    }
}
