//! # 晶格常数表解析器
//!
//! 读取 `Lattice_all.csv` 中的 fcc 晶格常数。表中可能还有 hcp/dhcp 列，这里忽略。
//!
//! ## 依赖关系
//! - 被 `annni/pipeline.rs` 使用
//! - 使用 `models/alloy.rs`

use super::{de_temperature, open_table};
use crate::error::{Result, SfeError};
use crate::models::LatticeRecord;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const TABLE: &str = "Lattice";

/// 必需列
pub const LATTICE_COLUMNS: [&str; 3] = ["composition", "T(K)", "a_fcc(Å)"];

#[derive(Debug, Deserialize)]
struct LatticeRow {
    composition: String,
    #[serde(rename = "T(K)", deserialize_with = "de_temperature")]
    temperature: i64,
    #[serde(rename = "a_fcc(Å)")]
    a_fcc: f64,
}

/// 加载晶格常数表
pub fn load_lattice_table(path: &Path) -> Result<Vec<LatticeRecord>> {
    let (mut rdr, _) = open_table(path, TABLE, &LATTICE_COLUMNS)?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for row in rdr.deserialize::<LatticeRow>() {
        let row = row.map_err(|e| SfeError::ParseError {
            table: TABLE.to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let record = LatticeRecord {
            composition: row.composition,
            temperature: row.temperature,
            a_fcc_raw: row.a_fcc,
        };

        if !seen.insert(record.key()) {
            return Err(SfeError::DuplicateKey {
                table: TABLE.to_string(),
                composition: record.composition,
                temperature: record.temperature,
            });
        }
        records.push(record);
    }

    Ok(records)
}
