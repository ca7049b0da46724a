//! # ANNNI 标定模块
//!
//! 用 ANNNI 模型从体相能量预测层错能，并按层错类型对 DMLF 参考值做比例标定。
//!
//! ## 子模块
//! - `config`: 运行配置
//! - `model`: J1/J2、层错能分子与单位换算
//! - `fit`: 过原点最小二乘与百分比误差
//! - `pipeline`: 加载、选取、连接（`prepare`），推导、拟合（`calibrate`）
//! - `export`: 结果 CSV 写出
//!
//! ## 依赖关系
//! - 被 `commands/calibrate.rs` 使用
//! - 使用 `parsers/` 和 `models/`

pub mod config;
pub mod export;
pub mod fit;
pub mod model;
pub mod pipeline;

pub use config::CalibrationConfig;
pub use pipeline::{calibrate, prepare};
