//! # 绘图数据序列
//!
//! 把标定结果或层错能表整理成按成分分组、按温度排序的折线序列。
//! 无定义的数值直接跳过。
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 序列交给 `plot/chart.rs` 渲染

use crate::models::{AlloyRecord, CalibrationRow, FaultType};

/// 折线样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// 粗实线（ANNNI）
    Solid,
    /// 细线加圆点标记（DMLF）
    Marked,
}

/// 一条折线
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// (温度 K, γ mJ/m²)，按温度升序
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
    /// 调色板序号，同一成分的序列共用
    pub color: usize,
}

/// 图例中的成分名: `Cr0.33_Co0.33_Fe0.33` -> `Cr0.33Co0.33Fe0.33`
pub fn legend_label(composition: &str) -> String {
    composition.replace('_', "")
}

/// 按首次出现顺序列出成分
fn compositions_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

fn sorted_points(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

/// ANNNI 与标定后 DMLF 随温度变化，每个成分两条线
pub fn calibrated_series(rows: &[CalibrationRow], fault: FaultType) -> Vec<Series> {
    let compositions = compositions_in_order(rows.iter().map(|r| r.composition.as_str()));

    let mut series = Vec::new();
    for (color, comp) in compositions.into_iter().enumerate() {
        let subset: Vec<&CalibrationRow> = rows.iter().filter(|r| r.composition == comp).collect();
        let label = legend_label(comp);

        let annni = sorted_points(
            subset
                .iter()
                .filter_map(|r| {
                    r.faults
                        .get(fault)
                        .analytical
                        .map(|g| (r.temperature as f64, g))
                })
                .collect(),
        );
        let scaled = sorted_points(
            subset
                .iter()
                .filter_map(|r| {
                    r.faults
                        .get(fault)
                        .empirical_scaled
                        .map(|g| (r.temperature as f64, g))
                })
                .collect(),
        );

        if !annni.is_empty() {
            series.push(Series {
                label: format!("{} ANNNI", label),
                points: annni,
                style: SeriesStyle::Solid,
                color,
            });
        }
        if !scaled.is_empty() {
            series.push(Series {
                label: format!("{} Scaled DMLF", label),
                points: scaled,
                style: SeriesStyle::Marked,
                color,
            });
        }
    }
    series
}

/// DMLF 层错能随温度变化，每个成分一条线
pub fn temperature_series(records: &[AlloyRecord], fault: FaultType) -> Vec<Series> {
    let compositions = compositions_in_order(records.iter().map(|r| r.composition.as_str()));

    compositions
        .into_iter()
        .enumerate()
        .filter_map(|(color, comp)| {
            let points = sorted_points(
                records
                    .iter()
                    .filter(|r| r.composition == comp)
                    .filter_map(|r| r.empirical.get(fault).map(|g| (r.temperature as f64, g)))
                    .collect(),
            );
            if points.is_empty() {
                return None;
            }
            Some(Series {
                label: comp.to_string(),
                points,
                style: SeriesStyle::Marked,
                color,
            })
        })
        .collect()
}
