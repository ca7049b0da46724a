//! # 绘图模块
//!
//! 层错能随温度变化的折线图。
//!
//! ## 子模块
//! - `series`: 从表格数据整理折线序列
//! - `chart`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 使用
//! - 使用 `models/`

pub mod chart;
pub mod series;

pub use chart::{render_chart, ChartSpec};
pub use series::{calibrated_series, temperature_series, Series};
