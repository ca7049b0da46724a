//! # 折线图渲染
//!
//! 使用 `plotters` 把若干条 γ-T 折线画到同一张图上，支持 PNG 和 SVG 输出。
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 使用 `plot/series.rs` 的 Series
//! - 使用 `plotters` 渲染图表

use super::series::{Series, SeriesStyle};
use crate::error::{Result, SfeError};

use plotters::prelude::*;
use std::path::Path;

/// 图表外观
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub width: u32,
    pub height: u32,
}

const PALETTE: [RGBColor; 8] = [
    RGBColor(0, 102, 204),
    RGBColor(204, 51, 17),
    RGBColor(0, 153, 136),
    RGBColor(238, 119, 51),
    RGBColor(51, 34, 136),
    RGBColor(170, 51, 119),
    RGBColor(102, 153, 0),
    RGBColor(85, 85, 85),
];

fn plot_err<E: std::fmt::Debug>(e: E) -> SfeError {
    SfeError::PlotError(format!("{:?}", e))
}

/// 渲染折线图
pub fn render_chart(
    series: &[Series],
    spec: &ChartSpec,
    output_path: &Path,
    use_svg: bool,
) -> Result<()> {
    if series.iter().all(|s| s.points.is_empty()) {
        return Err(SfeError::PlotError(format!(
            "no data to plot for '{}'",
            spec.title
        )));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        draw_chart(&root, series, spec)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        draw_chart(&root, series, spec)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 坐标范围，两端各留 5% (x) / 10% (y) 余量
pub fn axis_ranges(series: &[Series]) -> ((f64, f64), (f64, f64)) {
    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let pad = |lo: f64, hi: f64, frac: f64| {
        let span = hi - lo;
        let margin = if span > 0.0 { span * frac } else { lo.abs().max(1.0) * frac };
        (lo - margin, hi + margin)
    };
    (pad(x_min, x_max, 0.05), pad(y_min, y_max, 0.1))
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    series: &[Series],
    spec: &ChartSpec,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(series);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 26).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    for s in series {
        let color = PALETTE[s.color % PALETTE.len()];
        match s.style {
            SeriesStyle::Solid => {
                chart
                    .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(3)))
                    .map_err(plot_err)?
                    .label(s.label.clone())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                    });
            }
            SeriesStyle::Marked => {
                chart
                    .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(1)))
                    .map_err(plot_err)?;
                chart
                    .draw_series(
                        s.points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                    )
                    .map_err(plot_err)?
                    .label(s.label.clone())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 13))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}
