//! # 能量/层错能表解析器
//!
//! 读取 `SFE_all.csv`：每个 (成分, 温度) 的三种体相能量和 DMLF 层错能。
//!
//! ## 依赖关系
//! - 被 `annni/pipeline.rs` 和 `commands/plot.rs` 使用
//! - 使用 `models/alloy.rs`

use super::{de_optional_f64, de_temperature, open_table};
use crate::error::{Result, SfeError};
use crate::models::{AlloyRecord, PerFault};

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const TABLE: &str = "SFE";

/// 必需列
pub const SFE_COLUMNS: [&str; 8] = [
    "composition",
    "T(K)",
    "E_fcc(eV/atom)",
    "E_hcp(eV/atom)",
    "E_dhcp(eV/atom)",
    "γ_ISF(mJ/m²)",
    "γ_ESF(mJ/m²)",
    "γ_Twin(mJ/m²)",
];

#[derive(Debug, Deserialize)]
struct SfeRow {
    composition: String,
    #[serde(rename = "T(K)", deserialize_with = "de_temperature")]
    temperature: i64,
    #[serde(rename = "E_fcc(eV/atom)")]
    e_fcc: f64,
    #[serde(rename = "E_hcp(eV/atom)")]
    e_hcp: f64,
    #[serde(rename = "E_dhcp(eV/atom)")]
    e_dhcp: f64,
    #[serde(rename = "γ_ISF(mJ/m²)", deserialize_with = "de_optional_f64")]
    isf: Option<f64>,
    #[serde(rename = "γ_ESF(mJ/m²)", deserialize_with = "de_optional_f64")]
    esf: Option<f64>,
    #[serde(rename = "γ_Twin(mJ/m²)", deserialize_with = "de_optional_f64")]
    twin: Option<f64>,
}

impl SfeRow {
    /// 第一个非有限数值所在的列
    fn non_finite_column(&self) -> Option<&'static str> {
        let energies = [
            (SFE_COLUMNS[2], self.e_fcc),
            (SFE_COLUMNS[3], self.e_hcp),
            (SFE_COLUMNS[4], self.e_dhcp),
        ];
        let gammas = [
            (SFE_COLUMNS[5], self.isf),
            (SFE_COLUMNS[6], self.esf),
            (SFE_COLUMNS[7], self.twin),
        ];
        energies
            .iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .or_else(|| {
                gammas
                    .iter()
                    .find(|(_, v)| v.is_some_and(|g| !g.is_finite()))
                    .map(|(name, _)| *name)
            })
    }
}

impl From<SfeRow> for AlloyRecord {
    fn from(row: SfeRow) -> Self {
        AlloyRecord {
            composition: row.composition,
            temperature: row.temperature,
            e_fcc: row.e_fcc,
            e_hcp: row.e_hcp,
            e_dhcp: row.e_dhcp,
            empirical: PerFault::new(row.isf, row.esf, row.twin),
        }
    }
}

/// 加载能量/层错能表
pub fn load_sfe_table(path: &Path) -> Result<Vec<AlloyRecord>> {
    let (mut rdr, _) = open_table(path, TABLE, &SFE_COLUMNS)?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for row in rdr.deserialize::<SfeRow>() {
        let row = row.map_err(|e| SfeError::ParseError {
            table: TABLE.to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // f64 解析接受 nan/inf，这里拒绝
        if let Some(column) = row.non_finite_column() {
            return Err(SfeError::ParseError {
                table: TABLE.to_string(),
                path: path.display().to_string(),
                reason: format!(
                    "non-finite value in '{}' for ({}, {} K)",
                    column, row.composition, row.temperature
                ),
            });
        }
        let record = AlloyRecord::from(row);

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
