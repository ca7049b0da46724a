//! # 合金输入记录数据模型
//!
//! 能量/层错能表与晶格常数表的强类型行，以及连接后的记录。
//!
//! ## 依赖关系
//! - 被 `parsers/sfe_table.rs`, `parsers/lattice_table.rs` 构造
//! - 被 `annni/pipeline.rs` 使用
//! - 使用 `regex` 解析成分标识

use super::calibration::PerFault;
use regex::Regex;
use std::sync::OnceLock;

/// 表主键: (成分标识, 温度 K)
pub type RecordKey = (String, i64);

/// 能量/层错能表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct AlloyRecord {
    /// 成分标识，如 `Cr0.33_Co0.33_Fe0.33`
    pub composition: String,

    /// 温度 (K)
    pub temperature: i64,

    /// fcc 体相能量 (eV/atom)
    pub e_fcc: f64,

    /// hcp 体相能量 (eV/atom)
    pub e_hcp: f64,

    /// dhcp 体相能量 (eV/atom)
    pub e_dhcp: f64,

    /// DMLF 参考层错能 (mJ/m²)，空单元格为 None
    pub empirical: PerFault<Option<f64>>,
}

impl AlloyRecord {
    pub fn key(&self) -> RecordKey {
        (self.composition.clone(), self.temperature)
    }
}

/// 晶格常数表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeRecord {
    pub composition: String,
    pub temperature: i64,

    /// fcc 晶格常数，模拟程序原生单位（除以 10 得到 Å）
    pub a_fcc_raw: f64,
}

impl LatticeRecord {
    pub fn key(&self) -> RecordKey {
        (self.composition.clone(), self.temperature)
    }
}

/// 左连接后的记录
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub alloy: AlloyRecord,

    /// fcc 晶格常数 (Å)；没有匹配的晶格记录时为 None
    pub lattice_angstrom: Option<f64>,
}

/// Cr/Co/Fe 摩尔分数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub cr: f64,
    pub co: f64,
    pub fe: f64,
}

impl Composition {
    /// 解析 `Cr<f>_Co<f>_Fe<f>` 形式的成分标识
    pub fn parse(identifier: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"^Cr(\d*\.?\d+)_Co(\d*\.?\d+)_Fe(\d*\.?\d+)$").expect("valid regex")
        });

        let caps = re.captures(identifier.trim())?;
        Some(Composition {
            cr: caps[1].parse().ok()?,
            co: caps[2].parse().ok()?,
            fe: caps[3].parse().ok()?,
        })
    }

    pub fn fraction_sum(&self) -> f64 {
        self.cr + self.co + self.fe
    }

    /// 分数之和是否在容差内等于 1
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.fraction_sum() - 1.0).abs() <= tolerance
    }
}
