//! # 解析器模块
//!
//! 读取 CSV 表格并转换为强类型记录。列是否齐全在加载时一次性检查。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `annni/pipeline.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: sfe_table, lattice_table, calibrated

pub mod calibrated;
pub mod lattice_table;
pub mod sfe_table;

use crate::error::{Result, SfeError};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::path::Path;

/// 打开 CSV 表并校验表头
///
/// 返回读取器以及每个必需列在表头中的位置（与 `required` 顺序一致）。
pub fn open_table(
    path: &Path,
    table: &str,
    required: &[&str],
) -> Result<(csv::Reader<File>, Vec<usize>)> {
    if !path.is_file() {
        return Err(SfeError::MissingInputFile {
            path: path.display().to_string(),
        });
    }

    // 存在但无法读取的文件同样视为缺失
    let file = File::open(path).map_err(|_| SfeError::MissingInputFile {
        path: path.display().to_string(),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr.headers().map_err(|e| SfeError::ParseError {
        table: table.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let indices = column_indices(headers, required).map_err(|column| SfeError::MissingColumn {
        table: table.to_string(),
        column,
        path: path.display().to_string(),
    })?;

    Ok((rdr, indices))
}

/// 查找每个必需列的位置；缺失时返回第一个缺失的列名
pub fn column_indices(
    headers: &csv::StringRecord,
    required: &[&str],
) -> std::result::Result<Vec<usize>, String> {
    required
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == *name)
                .ok_or_else(|| name.to_string())
        })
        .collect()
}

/// 解析温度，接受 `300` 或 `300.0`
pub fn parse_temperature(raw: &str) -> std::result::Result<i64, String> {
    let t = raw.trim();
    if let Ok(v) = t.parse::<i64>() {
        return Ok(v);
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(format!("invalid temperature '{}'", raw)),
    }
}

/// 解析可能为空的数值单元格；空串和 `nan` 视为缺失
pub fn parse_optional_f64(raw: &str) -> std::result::Result<Option<f64>, String> {
    let t = raw.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    t.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid number '{}'", raw))
}

pub(crate) fn de_temperature<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_temperature(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn de_optional_f64<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_optional_f64(&raw).map_err(serde::de::Error::custom)
}
