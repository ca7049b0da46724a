//! # 数据模型模块
//!
//! 定义输入表记录和标定结果的强类型数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `annni/` 和 `commands/` 使用
//! - 子模块: alloy, calibration

pub mod alloy;
pub mod calibration;

pub use alloy::{AlloyRecord, Composition, JoinedRecord, LatticeRecord, RecordKey};
pub use calibration::{
    CalibrationReport, CalibrationRow, FaultEstimate, FaultType, PerFault, RowIssue,
};
