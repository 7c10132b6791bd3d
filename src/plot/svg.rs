//! SVG chart files via Plotters.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::AppError;
use crate::plot::{ChartData, X_LABEL, X_TICKS, Y_LABEL, fmt_tick};

pub const DEFAULT_SVG_SIZE: (u32, u32) = (960, 600);

/// Render a chart to an SVG document in memory.
pub fn render_svg(chart: &ChartData, size: (u32, u32)) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, chart).map_err(|e| AppError::io(format!("Failed to render chart: {e}")))?;
        root.present()
            .map_err(|e| AppError::io(format!("Failed to render chart: {e}")))?;
    }
    Ok(svg)
}

/// Render a chart and write it to `path`.
pub fn write_svg(path: &Path, chart: &ChartData, size: (u32, u32)) -> Result<(), AppError> {
    let svg = render_svg(chart, size)?;
    std::fs::write(path, svg)
        .map_err(|e| AppError::io(format!("Failed to write SVG '{}': {e}", path.display())))?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartData,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (x0, x1) = chart.x_bounds();
    let (y0, y1) = chart.y_bounds();

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(X_TICKS)
        .y_labels(X_TICKS)
        .x_label_formatter(&|v| fmt_tick(*v))
        .y_label_formatter(&|v| fmt_tick(*v))
        .draw()?;

    let curve_color = RGBColor(214, 39, 40);
    let points_color = RGBColor(31, 119, 180);

    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, points_color.filled())),
    )?
    .label("data")
    .legend(move |(x, y)| Circle::new((x + 10, y), 4, points_color.filled()));

    ctx.draw_series(LineSeries::new(
        chart.curve.iter().copied(),
        curve_color.stroke_width(2),
    ))?
    .label(chart.title.as_str())
    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], curve_color.stroke_width(2)));

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}
