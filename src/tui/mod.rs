//! Ratatui-based terminal UI.
//!
//! Layout: an input panel (manual entry grid or table file path) and the
//! method/degree settings on the left; the results panel and the fitted
//! chart on the right; key help and the status line at the bottom.
//!
//! Every edit, file load or settings change recomputes the whole view
//! (validate input, then run the orchestrator), so what is shown always
//! matches the current inputs.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use tracing::info;

use crate::app::pipeline::{self, FitOutcome};
use crate::cli::TuiArgs;
use crate::data::{Column, EntryTable, RowError};
use crate::debug::{DEBUG_DIR, write_debug_bundle};
use crate::domain::{DEFAULT_DEGREE, DataSet, FitRequest, MAX_DEGREE, MIN_DEGREE, ModelKind};
use crate::error::AppError;
use crate::plot::{ChartData, X_LABEL, X_TICKS, Y_LABEL, fmt_tick};
use crate::report::format_fit_summary;

mod plotters_chart;

use plotters_chart::FitPlottersChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let mut app = App::new(&args)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Manual,
    File,
}

impl InputMode {
    fn label(self) -> &'static str {
        match self {
            InputMode::Manual => "Manual entry",
            InputMode::File => "Table file",
        }
    }
}

/// Which panel receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// Entry grid or file path, depending on the input mode.
    Input,
    Method,
    Degree,
}

/// Method selector entries: "none selected" followed by every model.
const METHOD_CHOICES: [Option<ModelKind>; 6] = [
    None,
    Some(ModelKind::Linear),
    Some(ModelKind::Polynomial),
    Some(ModelKind::Exponential),
    Some(ModelKind::Logarithmic),
    Some(ModelKind::PowerLaw),
];

struct App {
    mode: InputMode,
    focus: Focus,

    table: EntryTable,
    cursor_row: usize,
    cursor_col: Column,

    file_path: String,
    delimiter: u8,
    /// Last successfully loaded table.
    file_data: Option<DataSet>,
    file_error: Option<String>,

    method: Option<ModelKind>,
    degree: u8,

    /// Data the current view was computed from.
    data: DataSet,
    /// Parse errors of the manual table, by cell.
    entry_errors: Vec<RowError>,
    /// Skipped half-filled rows (1-based).
    incomplete_rows: Vec<usize>,
    /// Input problem that prevented fitting (parse/format/io).
    input_error: Option<String>,
    outcome: FitOutcome,
    status: String,
}

impl App {
    fn new(args: &TuiArgs) -> Result<Self, AppError> {
        let delimiter = pipeline::delimiter_byte(args.delimiter)?;
        let mut app = Self {
            mode: InputMode::Manual,
            focus: Focus::Input,
            table: EntryTable::new(),
            cursor_row: 0,
            cursor_col: Column::X,
            file_path: String::new(),
            delimiter,
            file_data: None,
            file_error: None,
            method: args.model,
            degree: args.degree.unwrap_or(DEFAULT_DEGREE),
            data: DataSet::default(),
            entry_errors: Vec::new(),
            incomplete_rows: Vec::new(),
            input_error: None,
            outcome: FitOutcome::Prompt,
            status: "Type values, Tab to move between panels.".to_string(),
        };
        if let Some(path) = &args.file {
            app.mode = InputMode::File;
            app.file_path = path.display().to_string();
            app.load_file();
        }
        app.recompute();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.next_focus();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.prev_focus();
                return false;
            }
            KeyCode::F(2) => {
                self.toggle_mode();
                return false;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => match self.mode {
                InputMode::Manual => self.handle_entry_key(key.code),
                InputMode::File => self.handle_path_key(key.code),
            },
            Focus::Method | Focus::Degree => return self.handle_settings_key(key.code),
        }
        false
    }

    fn next_focus(&self) -> Focus {
        match self.focus {
            Focus::Input => Focus::Method,
            Focus::Method if self.method == Some(ModelKind::Polynomial) => Focus::Degree,
            Focus::Method | Focus::Degree => Focus::Input,
        }
    }

    fn prev_focus(&self) -> Focus {
        match self.focus {
            Focus::Input if self.method == Some(ModelKind::Polynomial) => Focus::Degree,
            Focus::Input => Focus::Method,
            Focus::Method => Focus::Input,
            Focus::Degree => Focus::Method,
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            InputMode::Manual => InputMode::File,
            InputMode::File => InputMode::Manual,
        };
        self.status = format!("Input: {}", self.mode.label());
        self.recompute();
    }

    fn handle_entry_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.focus = Focus::Method;
                return;
            }
            KeyCode::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
                return;
            }
            KeyCode::Down | KeyCode::Enter => {
                self.cursor_row = (self.cursor_row + 1).min(self.table.len() - 1);
                if code == KeyCode::Enter {
                    self.cursor_col = Column::X;
                }
                return;
            }
            KeyCode::Left => {
                self.cursor_col = Column::X;
                return;
            }
            KeyCode::Right => {
                self.cursor_col = Column::Y;
                return;
            }
            KeyCode::Backspace => self.table.pop_char(self.cursor_row, self.cursor_col),
            KeyCode::Delete => self.table.remove_row(self.cursor_row),
            KeyCode::Char(c) => self.table.push_char(self.cursor_row, self.cursor_col, c),
            _ => return,
        }
        self.cursor_row = self.cursor_row.min(self.table.len() - 1);
        self.recompute();
    }

    fn handle_path_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.focus = Focus::Method,
            KeyCode::Backspace => {
                self.file_path.pop();
            }
            KeyCode::Char(c) => self.file_path.push(c),
            KeyCode::Enter => {
                self.load_file();
                self.recompute();
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.focus = self.prev_focus(),
            KeyCode::Down => self.focus = self.next_focus(),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('d') => self.write_debug(),
            _ => {}
        }
        false
    }

    fn adjust(&mut self, delta: i32) {
        match self.focus {
            Focus::Method => {
                let n = METHOD_CHOICES.len() as i32;
                let cur = METHOD_CHOICES
                    .iter()
                    .position(|m| *m == self.method)
                    .unwrap_or(0) as i32;
                self.method = METHOD_CHOICES[(cur + delta).rem_euclid(n) as usize];
                self.status = format!(
                    "Method: {}",
                    self.method.map_or("none", ModelKind::display_name)
                );
            }
            Focus::Degree => {
                let next = i32::from(self.degree) + delta;
                self.degree = next.clamp(i32::from(MIN_DEGREE), i32::from(MAX_DEGREE)) as u8;
                self.status = format!("Degree: {}", self.degree);
            }
            Focus::Input => return,
        }
        self.recompute();
    }

    fn load_file(&mut self) {
        let path = self.file_path.trim();
        if path.is_empty() {
            self.file_data = None;
            self.file_error = None;
            return;
        }
        match pipeline::load_file(Path::new(path), self.delimiter) {
            Ok(data) => {
                self.status = format!("Loaded {} points from {path}", data.len());
                self.file_data = Some(data);
                self.file_error = None;
            }
            Err(e) => {
                self.status = format!("Load failed: {e}");
                self.file_data = None;
                self.file_error = Some(e.to_string());
            }
        }
    }

    fn write_debug(&mut self) {
        let request = self.request().ok().flatten();
        match write_debug_bundle(Path::new(DEBUG_DIR), &self.data, request.as_ref()) {
            Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
            Err(err) => self.status = format!("Debug write failed: {err}"),
        }
    }

    fn request(&self) -> Result<Option<FitRequest>, AppError> {
        let degree = (self.method == Some(ModelKind::Polynomial)).then_some(self.degree);
        pipeline::resolve_request(self.method, degree)
    }

    /// Rebuild the data set and the fit outcome from the current inputs.
    fn recompute(&mut self) {
        self.entry_errors.clear();
        self.incomplete_rows.clear();
        self.input_error = None;

        let data = match self.mode {
            InputMode::Manual => {
                let report = self.table.to_report();
                self.entry_errors = report.errors.clone();
                self.incomplete_rows = report.incomplete.clone();
                pipeline::entry_dataset(&report)
            }
            InputMode::File => match &self.file_error {
                Some(msg) => Err(AppError::io(msg.clone())),
                None => Ok(self.file_data.clone().unwrap_or_default()),
            },
        };

        let data = match data {
            Ok(data) => data,
            Err(e) => {
                self.input_error = Some(e.to_string());
                self.data = DataSet::default();
                self.outcome = FitOutcome::Prompt;
                return;
            }
        };
        self.data = data;

        self.outcome = match self.request() {
            Ok(request) => pipeline::evaluate(&self.data, request.as_ref()),
            Err(e) => FitOutcome::Failed(e),
        };
        if let FitOutcome::Fitted(result) = &self.outcome {
            info!(model = %result.request.label(), n = self.data.len(), "view refreshed");
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("curvefit", Style::default().fg(Color::Cyan)),
            Span::raw(" - regression curve fitting"),
            Span::styled(
                format!("  | input: {} | n={}", self.mode.label(), self.data.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(columns[0]);
        match self.mode {
            InputMode::Manual => self.draw_entry(frame, left[0]),
            InputMode::File => self.draw_file_input(frame, left[0]),
        }
        self.draw_settings(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(columns[1]);
        self.draw_results(frame, right[0]);
        self.draw_chart(frame, right[1]);
    }

    fn draw_entry(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Input;
        let rows = self.table.rows().iter().enumerate().map(|(i, row)| {
            let cell = |column: Column| {
                let text = row.cell(column).to_string();
                let invalid = self
                    .entry_errors
                    .iter()
                    .any(|e| e.row == i + 1 && e.column == column);
                let mut style = if invalid {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                if focused && i == self.cursor_row && column == self.cursor_col {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(if text.is_empty() { " ".to_string() } else { text }).style(style)
            };
            let number_style = if self.incomplete_rows.contains(&(i + 1)) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)).style(number_style),
                cell(Column::X),
                cell(Column::Y),
            ])
        });

        let table = Table::new(
            rows,
            [Constraint::Length(4), Constraint::Min(10), Constraint::Min(10)],
        )
        .header(
            Row::new(vec!["#", "X", "Y"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(panel("Data (manual)", focused));

        let mut state = TableState::default();
        state.select(Some(self.cursor_row));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_file_input(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Input;
        let mut lines = vec![
            Line::from("Path (Enter to load):"),
            Line::from(Span::styled(
                format!("{}{}", self.file_path, if focused { "_" } else { "" }),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        match (&self.file_error, &self.file_data) {
            (Some(err), _) => lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red),
            ))),
            (None, Some(data)) => lines.push(Line::from(format!("{} points loaded", data.len()))),
            (None, None) => lines.push(Line::from(Span::styled(
                "Two columns (x, y), no header.",
                Style::default().fg(Color::Gray),
            ))),
        }
        let p = Paragraph::new(Text::from(lines))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(panel("Data (file)", focused));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let marker = |f: Focus| if self.focus == f { "» " } else { "  " };
        let method = self.method.map_or("Select a method", ModelKind::display_name);
        let degree = if self.method == Some(ModelKind::Polynomial) {
            self.degree.to_string()
        } else {
            "- (polynomial only)".to_string()
        };
        let lines = vec![
            Line::from(format!("{}Method: ‹ {method} ›", marker(Focus::Method))),
            Line::from(format!("{}Degree: {degree}", marker(Focus::Degree))),
        ];
        let focused = matches!(self.focus, Focus::Method | Focus::Degree);
        let p = Paragraph::new(Text::from(lines)).block(panel("Fit", focused));
        frame.render_widget(p, area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        if let Some(err) = &self.input_error {
            lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
            let more = self.entry_errors.len().saturating_sub(1);
            if more > 0 {
                lines.push(Line::from(Span::styled(
                    format!("(+{more} more invalid cell(s))"),
                    Style::default().fg(Color::Red),
                )));
            }
        } else {
            match &self.outcome {
                FitOutcome::Fitted(result) => {
                    for l in format_fit_summary(result).lines() {
                        lines.push(Line::from(l.to_string()));
                    }
                }
                other => {
                    if let Some(msg) = other.message() {
                        let color = if matches!(other, FitOutcome::Failed(_)) {
                            Color::Red
                        } else {
                            Color::Yellow
                        };
                        lines.push(Line::from(Span::styled(msg, Style::default().fg(color))));
                    }
                }
            }
        }
        if !self.incomplete_rows.is_empty() {
            let rows: Vec<String> = self.incomplete_rows.iter().map(|r| r.to_string()).collect();
            lines.push(Line::from(Span::styled(
                format!("Skipped incomplete row(s): {}", rows.join(", ")),
                Style::default().fg(Color::Yellow),
            )));
        }
        let p = Paragraph::new(Text::from(lines))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(Block::default().title("Results").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let FitOutcome::Fitted(result) = &self.outcome else {
            let block = Block::default().title("Chart").borders(Borders::ALL);
            let msg = Paragraph::new("No fit to show.")
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let chart = ChartData::for_fit(&self.data, result);
        let block = Block::default().title(chart.title.clone()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = FitPlottersChart {
            curve: &chart.curve,
            points: &chart.points,
            title: &chart.title,
            x_bounds: chart.x_bounds(),
            y_bounds: chart.y_bounds(),
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, &chart);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab panel  F2/m input mode  ←/→ change  Del row  d debug  q/Esc quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(style)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 3,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Five x ticks under the chart, five y ticks to its left, and the axis names.
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    data: &ChartData,
) {
    let style = Style::default().fg(Color::Gray);
    let inner_right = inner.x + inner.width;

    let y = chart.y + chart.height;
    if y < inner.y + inner.height - 1 {
        for (i, x_val) in data.x_ticks().iter().enumerate() {
            let u = i as f64 / (X_TICKS as f64 - 1.0);
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let label = fmt_tick(*x_val);
            let label_len = label.len() as u16;
            let start = x.saturating_sub(label_len / 2).min(inner_right.saturating_sub(label_len));
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len,
                    height: 1,
                },
            );
        }
    }

    let (y_min, y_max) = data.y_bounds();
    for i in 0..X_TICKS {
        let u = i as f64 / (X_TICKS as f64 - 1.0);
        let y_val = y_min + u * (y_max - y_min);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_tick(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(X_LABEL)
        .alignment(Alignment::Center)
        .style(style.add_modifier(Modifier::BOLD));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(Y_LABEL).style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::io::DEFAULT_DELIMITER;

    fn args() -> TuiArgs {
        TuiArgs {
            file: None,
            delimiter: DEFAULT_DELIMITER as char,
            model: None,
            degree: None,
            log_file: None,
        }
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn enter_point(app: &mut App, x: &str, y: &str) {
        press(app, KeyCode::Left);
        type_text(app, x);
        press(app, KeyCode::Right);
        type_text(app, y);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn starts_with_prompt_and_blank_row() {
        let app = App::new(&args()).unwrap();
        assert_eq!(app.table.len(), 1);
        assert_eq!(app.outcome.message().unwrap(), pipeline::PROMPT_MESSAGE);
    }

    #[test]
    fn typing_points_then_choosing_linear_fits() {
        let mut app = App::new(&args()).unwrap();
        enter_point(&mut app, "1", "2");
        enter_point(&mut app, "2", "4");
        enter_point(&mut app, "3", "6");
        assert_eq!(app.table.len(), 4);
        assert_eq!(app.data.len(), 3);
        assert!(matches!(app.outcome, FitOutcome::Prompt));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.method, Some(ModelKind::Linear));
        let FitOutcome::Fitted(result) = &app.outcome else {
            panic!("expected a fit");
        };
        assert_eq!(result.formula, "y = 2.00x + 0.00");
    }

    #[test]
    fn invalid_cell_blocks_fit_and_is_flagged() {
        let mut a = args();
        a.model = Some(ModelKind::Linear);
        let mut app = App::new(&a).unwrap();
        enter_point(&mut app, "1", "2");
        enter_point(&mut app, "abc", "4");
        enter_point(&mut app, "3", "6");

        assert_eq!(app.entry_errors.len(), 1);
        assert_eq!(app.entry_errors[0].row, 2);
        assert!(app.input_error.as_deref().unwrap().contains("row 2"));

        // Fix the cell: the fit comes back.
        app.cursor_row = 1;
        app.cursor_col = Column::X;
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "2");
        assert!(app.input_error.is_none());
        assert!(matches!(app.outcome, FitOutcome::Fitted(_)));
    }

    #[test]
    fn degree_is_clamped_and_only_reachable_for_polynomials() {
        let mut a = args();
        a.model = Some(ModelKind::Polynomial);
        let mut app = App::new(&a).unwrap();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Method);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Degree);
        for _ in 0..20 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.degree, MAX_DEGREE);
        for _ in 0..20 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.degree, MIN_DEGREE);

        // Switching away from polynomial skips the degree field.
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.method, Some(ModelKind::Exponential));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn method_selector_wraps_through_none() {
        let mut app = App::new(&args()).unwrap();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.method, Some(ModelKind::PowerLaw));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.method, None);
    }

    #[test]
    fn missing_file_is_reported_without_fitting() {
        let mut a = args();
        a.file = Some(PathBuf::from("/nonexistent/curvefit/data.csv"));
        a.model = Some(ModelKind::Linear);
        let app = App::new(&a).unwrap();
        assert_eq!(app.mode, InputMode::File);
        assert!(app.input_error.is_some());
        assert!(app.data.is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new(&args()).unwrap();
        // In the entry grid `q` is text.
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        press(&mut app, KeyCode::Tab);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
