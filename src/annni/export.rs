//! # 标定结果导出
//!
//! 把标定结果写入 CSV。先写到同目录下的临时文件，成功后再重命名，
//! 因此目标文件要么是完整的新内容，要么保持不变。
//!
//! ## 依赖关系
//! - 被 `commands/calibrate.rs` 调用
//! - 使用 `parsers/calibrated.rs` 的列定义
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, SfeError};
use crate::models::{CalibrationRow, FaultType};
use crate::parsers::calibrated::{format_cell, header};

use std::fs;
use std::path::{Path, PathBuf};

/// 写出标定结果表（整体覆盖）
pub fn write_calibrated_csv(rows: &[CalibrationRow], output_path: &Path) -> Result<()> {
    let tmp_path = temporary_path(output_path);

    let written = write_rows(rows, &tmp_path).and_then(|_| {
        fs::rename(&tmp_path, output_path).map_err(|e| SfeError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })
    });

    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn write_rows(rows: &[CalibrationRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(header())?;

    for row in rows {
        let mut record = vec![
            row.composition.clone(),
            row.temperature.to_string(),
            format_cell(row.lattice_angstrom),
        ];
        record.extend(FaultType::ALL.iter().map(|f| format_cell(row.faults.get(*f).analytical)));
        record.extend(
            FaultType::ALL
                .iter()
                .map(|f| format_cell(row.faults.get(*f).empirical_raw)),
        );
        record.extend(
            FaultType::ALL
                .iter()
                .map(|f| format_cell(row.faults.get(*f).empirical_scaled)),
        );
        record.extend(
            FaultType::ALL
                .iter()
                .map(|f| format_cell(row.faults.get(*f).percent_error)),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| SfeError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// `dir/out.csv` -> `dir/.out.csv.tmp`
fn temporary_path(output_path: &Path) -> PathBuf {
    let name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "calibrated.csv".to_string());
    output_path.with_file_name(format!(".{}.tmp", name))
}
