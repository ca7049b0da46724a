//! # ANNNI 模型
//!
//! 由三种体相能量（每原子）求 ANNNI 耦合常数 J1, J2：
//!
//! ```text
//! E_fcc  = J0 - J1 - J2
//! E_hcp  = J0 + J1 - J2
//! E_dhcp = J0 + J2
//! ```
//!
//! 再得到每个 {111} 位点的层错能分子 (eV)，并用 {111} 面的位点面积换算为 mJ/m²。
//!
//! ## 依赖关系
//! - 被 `annni/pipeline.rs` 使用
//! - 使用 `models::PerFault`

use crate::models::PerFault;

/// 1 eV/Å² = 16021.766 mJ/m²
pub const EV_PER_A2_TO_MJ_PER_M2: f64 = 16021.766;

/// ANNNI 耦合常数 (eV/atom)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnniCouplings {
    pub j1: f64,
    pub j2: f64,
}

impl AnnniCouplings {
    /// 从 fcc/hcp/dhcp 体相能量求 J1, J2
    pub fn from_bulk(e_fcc: f64, e_hcp: f64, e_dhcp: f64) -> Self {
        AnnniCouplings {
            j1: 0.5 * (e_hcp - e_fcc),
            j2: 0.5 * (e_dhcp - 0.5 * (e_fcc + e_hcp)),
        }
    }

    /// 层错能分子 (eV / {111} 位点)
    ///
    /// ISF: 4(J1 + J2), ESF: 4J1 + 8J2, Twin: 2J1 + 4J2
    pub fn numerators(&self) -> PerFault<f64> {
        PerFault::new(
            4.0 * (self.j1 + self.j2),
            4.0 * self.j1 + 8.0 * self.j2,
            2.0 * self.j1 + 4.0 * self.j2,
        )
    }
}

/// {111} 面每个位点的面积 (Å²)，a 为 fcc 晶格常数 (Å)
pub fn site_area(a_angstrom: f64) -> f64 {
    (3.0_f64.sqrt() / 4.0) * a_angstrom * a_angstrom
}

/// 分子 (eV/位点) -> γ (mJ/m²)
pub fn to_mj_per_m2(numerator: f64, a_angstrom: f64) -> f64 {
    (numerator / site_area(a_angstrom)) * EV_PER_A2_TO_MJ_PER_M2
}

/// 三种层错的 ANNNI 层错能 (mJ/m²)
pub fn fault_energies(e_fcc: f64, e_hcp: f64, e_dhcp: f64, a_angstrom: f64) -> PerFault<f64> {
    AnnniCouplings::from_bulk(e_fcc, e_hcp, e_dhcp)
        .numerators()
        .map(|_, n| to_mj_per_m2(*n, a_angstrom))
}
