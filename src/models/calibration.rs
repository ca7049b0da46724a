//! # 标定结果数据模型
//!
//! 层错类型、按层错类型分组的容器、逐行标定结果以及整次运行的报告。
//!
//! ## 依赖关系
//! - 被 `annni/` 和 `commands/` 使用
//! - 被 `error.rs` 使用 (`FaultType`)

use std::fmt;

/// 层错类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultType {
    /// 内禀层错 (intrinsic stacking fault)
    Isf,
    /// 外禀层错 (extrinsic stacking fault)
    Esf,
    /// 孪晶界
    Twin,
}

impl FaultType {
    pub const ALL: [FaultType; 3] = [FaultType::Isf, FaultType::Esf, FaultType::Twin];

    /// 列名中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            FaultType::Isf => "ISF",
            FaultType::Esf => "ESF",
            FaultType::Twin => "Twin",
        }
    }

    /// 图表标题中使用的全称
    pub fn long_name(&self) -> &'static str {
        match self {
            FaultType::Isf => "Intrinsic Stacking Fault Energy",
            FaultType::Esf => "Extrinsic Stacking Fault Energy",
            FaultType::Twin => "Twin Fault Energy",
        }
    }
}

impl fmt::Display for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 每种层错类型各一个值
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerFault<T> {
    pub isf: T,
    pub esf: T,
    pub twin: T,
}

impl<T> PerFault<T> {
    pub fn new(isf: T, esf: T, twin: T) -> Self {
        PerFault { isf, esf, twin }
    }

    pub fn from_fn(mut f: impl FnMut(FaultType) -> T) -> Self {
        PerFault {
            isf: f(FaultType::Isf),
            esf: f(FaultType::Esf),
            twin: f(FaultType::Twin),
        }
    }

    pub fn get(&self, fault: FaultType) -> &T {
        match fault {
            FaultType::Isf => &self.isf,
            FaultType::Esf => &self.esf,
            FaultType::Twin => &self.twin,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(FaultType, &T) -> U) -> PerFault<U> {
        PerFault {
            isf: f(FaultType::Isf, &self.isf),
            esf: f(FaultType::Esf, &self.esf),
            twin: f(FaultType::Twin, &self.twin),
        }
    }

    /// 逐层错类型构造；任何一个失败则整体失败
    pub fn try_from_fn<E>(mut f: impl FnMut(FaultType) -> Result<T, E>) -> Result<Self, E> {
        Ok(PerFault {
            isf: f(FaultType::Isf)?,
            esf: f(FaultType::Esf)?,
            twin: f(FaultType::Twin)?,
        })
    }
}

/// 某一行某一种层错的标定数值。None 表示 "undefined"。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaultEstimate {
    /// ANNNI 解析值 (mJ/m²)
    pub analytical: Option<f64>,
    /// DMLF 原始值 (mJ/m²)
    pub empirical_raw: Option<f64>,
    /// 乘以标定因子后的 DMLF 值 (mJ/m²)
    pub empirical_scaled: Option<f64>,
    /// 100 * (ANNNI − scaled) / scaled
    pub percent_error: Option<f64>,
}

/// 输出表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRow {
    pub composition: String,
    pub temperature: i64,
    /// 晶格常数 (Å)
    pub lattice_angstrom: Option<f64>,
    pub faults: PerFault<FaultEstimate>,
}

/// 非致命的逐行问题
#[derive(Debug, Clone, PartialEq)]
pub enum RowIssue {
    /// 能量表中的键在晶格表中没有匹配
    JoinGap {
        composition: String,
        temperature: i64,
    },
    /// 标定后的参考值恰好为零，百分比误差无定义
    DivisionByZero {
        composition: String,
        temperature: i64,
        fault: FaultType,
    },
    /// 参考层错能单元格为空
    MissingEmpirical {
        composition: String,
        temperature: i64,
        fault: FaultType,
    },
    /// 成分标识无法解析（sum 为 None）或分数之和偏离 1
    CompositionSum {
        composition: String,
        sum: Option<f64>,
    },
    /// 能量表中没有该目标成分
    TargetNotFound { composition: String },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::JoinGap {
                composition,
                temperature,
            } => write!(
                f,
                "[join] No lattice parameter for ({}, {} K); ANNNI values undefined",
                composition, temperature
            ),
            RowIssue::DivisionByZero {
                composition,
                temperature,
                fault,
            } => write!(
                f,
                "[error] Scaled {} reference is zero for ({}, {} K); %error undefined",
                fault, composition, temperature
            ),
            RowIssue::MissingEmpirical {
                composition,
                temperature,
                fault,
            } => write!(
                f,
                "[load] Empty {} reference value for ({}, {} K)",
                fault, composition, temperature
            ),
            RowIssue::CompositionSum {
                composition,
                sum: Some(sum),
            } => write!(
                f,
                "[select] Fractions of {} sum to {:.3}, not 1.0",
                composition, sum
            ),
            RowIssue::CompositionSum {
                composition,
                sum: None,
            } => write!(
                f,
                "[select] Cannot read Cr/Co/Fe fractions from '{}'",
                composition
            ),
            RowIssue::TargetNotFound { composition } => write!(
                f,
                "[select] Target {} has no rows in the SFE table",
                composition
            ),
        }
    }
}

/// 一次标定运行的完整结果
#[derive(Debug, Clone)]
pub struct CalibrationReport {
    pub rows: Vec<CalibrationRow>,
    /// 每种层错的标定因子
    pub scale_factors: PerFault<f64>,
    /// 每种层错的最大 |%error|；没有任何已定义误差时为 None
    pub max_abs_error: PerFault<Option<f64>>,
    /// 拟合之后发现的问题
    pub issues: Vec<RowIssue>,
}
