//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - gridlines: `.` at the interior x ticks and y quarter marks
//! - x axis: `+` at each of the five tick positions

use crate::plot::{ChartData, X_LABEL, X_TICKS, Y_LABEL, fmt_tick};

const BLANK: char = ' ';
const GRID: char = '.';

/// Render a chart as text, `width` x `height` plot cells.
pub fn render_ascii(chart: &ChartData, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = chart.x_bounds();
    let (y_min, y_max) = chart.y_bounds();

    let mut grid = vec![vec![BLANK; width]; height];
    draw_gridlines(&mut grid);

    // Curve first so points overlay it.
    let mut prev = None;
    for &(x, y) in &chart.curve {
        if !(x.is_finite() && y.is_finite()) || x < x_min || x > x_max {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(&mut grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }

    for &(x, y) in &chart.points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&chart.title);
    out.push('\n');
    out.push_str(&format!("o data  - {}\n", chart.title));
    out.push_str(&format!(
        "{Y_LABEL}: [{}, {}]\n",
        fmt_tick(y_min),
        fmt_tick(y_max)
    ));

    for row in grid {
        out.push('|');
        out.extend(row);
        out.push('\n');
    }

    let mut axis = vec!['-'; width];
    for i in 0..X_TICKS {
        axis[tick_cell(i, width)] = '+';
    }
    out.push('+');
    out.extend(axis);
    out.push('\n');

    let labels: Vec<String> = chart.x_ticks().iter().map(|&t| fmt_tick(t)).collect();
    out.push_str(&format!("{X_LABEL}: {}\n", labels.join(", ")));
    out
}

/// Cell index of the i-th of `X_TICKS` evenly spaced marks across `len` cells.
fn tick_cell(i: usize, len: usize) -> usize {
    let u = i as f64 / (X_TICKS - 1) as f64;
    (u * (len as f64 - 1.0)).round() as usize
}

fn draw_gridlines(grid: &mut [Vec<char>]) {
    let height = grid.len();
    let width = grid[0].len();
    for i in 1..X_TICKS - 1 {
        let col = tick_cell(i, width);
        for row in grid.iter_mut() {
            row[col] = GRID;
        }
        let row = tick_cell(i, height);
        grid[row].fill(GRID);
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only background cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            if *cell == BLANK || *cell == GRID {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let chart = ChartData {
            title: "T".to_string(),
            points: vec![(0.0, 0.0), (4.0, 4.0)],
            curve: vec![(0.0, 0.0), (4.0, 4.0)],
        };

        let txt = render_ascii(&chart, 10, 5);
        let expected = concat!(
            "T\n",
            "o data  - T\n",
            "y: [-0.20, 4.20]\n",
            "|  .  . .-o\n",
            "|......--..\n",
            "|....--....\n",
            "|..--......\n",
            "|o-.  . .  \n",
            "++-+--+-+-+\n",
            "x: 0.00, 1.00, 2.00, 3.00, 4.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn curve_only_chart_has_no_markers() {
        let chart = ChartData {
            title: "Linear Regression".to_string(),
            points: vec![],
            curve: (0..50).map(|i| (f64::from(i), 2.0 * f64::from(i))).collect(),
        };
        let txt = render_ascii(&chart, 40, 12);
        assert!(txt.lines().skip(3).all(|l| !l.contains('o')));
        assert!(txt.starts_with("Linear Regression\n"));
        assert!(txt.ends_with("x: 0.00, 12.25, 24.50, 36.75, 49.00\n"));
    }

    #[test]
    fn tiny_sizes_are_clamped() {
        let chart = ChartData {
            title: "T".to_string(),
            points: vec![(1.0, 1.0)],
            curve: vec![],
        };
        let txt = render_ascii(&chart, 1, 1);
        // title, legend, y range, 5 rows, axis, ticks
        assert_eq!(txt.lines().count(), 10);
    }
}
