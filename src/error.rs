//! # 统一错误处理模块
//!
//! 定义 sfetool 的所有错误类型，使用 `thiserror` 派生。
//! 这里只包含致命错误；逐行的非致命问题见 `models::calibration::RowIssue`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 使用 `models::FaultType`

use crate::models::FaultType;
use thiserror::Error;

/// sfetool 统一错误类型
#[derive(Error, Debug)]
pub enum SfeError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("[load] Missing or unreadable input file: {path}")]
    MissingInputFile { path: String },

    #[error("[emit] Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 输入表错误
    // ─────────────────────────────────────────────────────────────
    #[error("[load] {table} table '{path}' is missing required column '{column}'")]
    MissingColumn {
        table: String,
        column: String,
        path: String,
    },

    #[error("[load] Failed to parse {table} table: {path}\nReason: {reason}")]
    ParseError {
        table: String,
        path: String,
        reason: String,
    },

    #[error("[load] Duplicate key ({composition}, {temperature} K) in {table} table")]
    DuplicateKey {
        table: String,
        composition: String,
        temperature: i64,
    },

    #[error(
        "[join] Non-positive lattice parameter {value} for ({composition}, {temperature} K)"
    )]
    InvalidLattice {
        composition: String,
        temperature: i64,
        value: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 拟合错误
    // ─────────────────────────────────────────────────────────────
    #[error("[fit] Degenerate fit for {fault}: no selected row has a positive reference value and a defined ANNNI value")]
    DegenerateFit { fault: FaultType },

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("[emit] CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("[plot] Failed to render chart: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SfeError>;
