//! Plotters-powered fit chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Tick labels and axis names are drawn by the
//! caller around the widget, so the Plotters chart itself has no label areas.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::X_TICKS;

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct FitPlottersChart<'a> {
    /// Line series for the fitted curve.
    pub curve: &'a [(f64, f64)],
    /// Scatter series for the observations.
    pub points: &'a [(f64, f64)],
    /// Legend label of the curve.
    pub title: &'a str,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
}

impl Widget for FitPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let (x0, x1) = self.x_bounds;
        let (y0, y1) = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Gridlines only: labels are drawn outside.
            let grid_color = RGBColor(90, 90, 90);
            chart
                .configure_mesh()
                .x_labels(X_TICKS)
                .y_labels(X_TICKS)
                .max_light_lines(0)
                .bold_line_style(&grid_color)
                .axis_style(&WHITE)
                .draw()?;

            let curve_color = RGBColor(0, 255, 255); // cyan
            let points_color = RGBColor(255, 215, 0); // gold

            chart
                .draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?
                .label(self.title)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 4, y)], &curve_color));

            // `Circle` radii are mis-scaled by the terminal backend; a
            // colored `Pixel` renders as a clean dot.
            chart
                .draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), points_color)))?
                .label("data")
                .legend(move |(x, y)| Pixel::new((x, y), points_color));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(("sans-serif", 10).into_font().color(&WHITE))
                .border_style(&WHITE)
                .draw()?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
