//! # 标定结果表
//!
//! `ANNNI_vs_DMLF_calibrated.csv` 的列定义，以及读回该表（供绘图使用）。
//! 无定义的单元格写作 `undefined`。
//!
//! ## 依赖关系
//! - 被 `annni/export.rs`（写）和 `commands/plot.rs`（读）使用
//! - 使用 `models/calibration.rs`

use super::{open_table, parse_optional_f64, parse_temperature};
use crate::error::{Result, SfeError};
use crate::models::{CalibrationRow, FaultEstimate, FaultType, PerFault};

use std::path::Path;

const TABLE: &str = "calibrated";

/// 无定义单元格的标记
pub const UNDEFINED: &str = "undefined";

pub const COMPOSITION_COLUMN: &str = "composition";
pub const TEMPERATURE_COLUMN: &str = "T(K)";
pub const LATTICE_COLUMN: &str = "a(Å)";

pub fn analytical_column(fault: FaultType) -> String {
    format!("γ_{}_ANNNI", fault.label())
}

pub fn raw_column(fault: FaultType) -> String {
    format!("γ_{}_DMLF", fault.label())
}

pub fn scaled_column(fault: FaultType) -> String {
    format!("γ_{}_DMLF_scaled", fault.label())
}

pub fn error_column(fault: FaultType) -> String {
    format!("%Error_vs_scaled_{}", fault.label())
}

/// 完整表头，按输出顺序
pub fn header() -> Vec<String> {
    let mut cols = vec![
        COMPOSITION_COLUMN.to_string(),
        TEMPERATURE_COLUMN.to_string(),
        LATTICE_COLUMN.to_string(),
    ];
    let groups: [fn(FaultType) -> String; 4] =
        [analytical_column, raw_column, scaled_column, error_column];
    for column in groups {
        cols.extend(FaultType::ALL.iter().map(|f| column(*f)));
    }
    cols
}

/// 格式化数值单元格
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", v),
        _ => UNDEFINED.to_string(),
    }
}

fn parse_cell(raw: &str) -> std::result::Result<Option<f64>, String> {
    if raw.trim() == UNDEFINED {
        return Ok(None);
    }
    parse_optional_f64(raw)
}

/// 读回标定结果表
pub fn load_calibrated_table(path: &Path) -> Result<Vec<CalibrationRow>> {
    let columns = header();
    let required: Vec<&str> = columns.iter().map(String::as_str).collect();
    let (mut rdr, idx) = open_table(path, TABLE, &required)?;

    let parse_error = |line: usize, reason: String| SfeError::ParseError {
        table: TABLE.to_string(),
        path: path.display().to_string(),
        reason: format!("record {}: {}", line, reason),
    };

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| parse_error(i + 1, e.to_string()))?;
        let cell = |k: usize| record.get(idx[k]).unwrap_or("");
        let number = |k: usize| parse_cell(cell(k)).map_err(|e| parse_error(i + 1, e));

        let temperature = parse_temperature(cell(1)).map_err(|e| parse_error(i + 1, e))?;
        let lattice_angstrom = number(2)?;

        // 列顺序: 3.. ANNNI, DMLF, scaled, error，每组三列
        let offset = |fault: FaultType| match fault {
            FaultType::Isf => 0,
            FaultType::Esf => 1,
            FaultType::Twin => 2,
        };
        let faults = PerFault::try_from_fn(|fault| -> Result<FaultEstimate> {
            let o = offset(fault);
            Ok(FaultEstimate {
                analytical: number(3 + o)?,
                empirical_raw: number(6 + o)?,
                empirical_scaled: number(9 + o)?,
                percent_error: number(12 + o)?,
            })
        })?;

        rows.push(CalibrationRow {
            composition: cell(0).to_string(),
            temperature,
            lattice_angstrom,
            faults,
        });
    }

    Ok(rows)
}
