//! # 标定因子拟合
//!
//! 每种层错一个标量 s，使 `s * DMLF` 在最小二乘意义下逼近 ANNNI：
//!
//! ```text
//! s = Σ(y_i * x_i) / Σ(y_i²)     仅对 y_i > 0 且 x_i, y_i 有限的行
//! ```
//!
//! 其中 x 为 ANNNI 值，y 为 DMLF 原始值。
//!
//! ## 依赖关系
//! - 被 `annni/pipeline.rs` 使用

/// 过原点的单参数最小二乘
///
/// `pairs` 为 (ANNNI, DMLF)。DMLF 不为正或含非有限值的行被忽略；若没有可用行则返回 None。
pub fn fit_scale_factor<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (num, den) = pairs
        .into_iter()
        .filter(|&(x, y)| x.is_finite() && y.is_finite() && y > 0.0)
        .fold((0.0, 0.0), |(num, den), (x, y)| (num + x * y, den + y * y));

    if den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

/// 相对于标定后参考值的百分比误差
///
/// 参考值恰好为零时无定义，返回 None。
pub fn percent_error(analytical: f64, scaled_reference: f64) -> Option<f64> {
    if scaled_reference == 0.0 {
        return None;
    }
    Some(100.0 * (analytical - scaled_reference) / scaled_reference)
}
