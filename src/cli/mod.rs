//! Command-line parsing for the curve fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! **command dispatch** (`app`) and from the modeling/math code.
//!
//! Settings that users tend to keep between runs can also come from the
//! environment (or a `.env` file): `CURVEFIT_MODEL`, `CURVEFIT_DEGREE`,
//! `CURVEFIT_DELIMITER`, `CURVEFIT_PLOT_WIDTH`, `CURVEFIT_PLOT_HEIGHT`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::ModelKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "curvefit", version, about = "Fit regression curves to (x, y) data")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model, print the formula and metrics, and optionally plot/export.
    Fit(FitArgs),
    /// Fit every model on the same data and print a ranked table.
    Compare(CompareArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Write a synthetic two-column table drawn from a known model.
    Sample(SampleArgs),
    /// Launch the interactive TUI (the default when no subcommand is given).
    Tui(TuiArgs),
}

/// Where the data comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Two-column table without a header (x, y).
    #[arg(short = 'f', long, value_name = "FILE", conflicts_with = "points")]
    pub file: Option<PathBuf>,

    /// A data point typed as `X,Y`. Repeat for more points.
    #[arg(
        short = 'p',
        long = "point",
        value_name = "X,Y",
        allow_hyphen_values = true
    )]
    pub points: Vec<String>,

    /// Field delimiter of the table file.
    #[arg(long, env = "CURVEFIT_DELIMITER", default_value_t = ',')]
    pub delimiter: char,
}

/// Options for `fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Model to fit. Without one, the run only prints a prompt.
    #[arg(short = 'm', long, value_enum, env = "CURVEFIT_MODEL")]
    pub model: Option<ModelKind>,

    /// Polynomial degree (2-10, default 2). Ignored for other models.
    #[arg(
        short = 'd',
        long,
        env = "CURVEFIT_DEGREE",
        value_parser = clap::value_parser!(u8).range(2..=10)
    )]
    pub degree: Option<u8>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, env = "CURVEFIT_PLOT_WIDTH", default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "CURVEFIT_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,

    /// Also render the chart to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export per-point residuals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export curve (request + params + fitted grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,

    /// Write a markdown debug bundle under `debug/`.
    #[arg(long)]
    pub debug: bool,
}

/// Options for `compare`.
#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Highest polynomial degree to include (2-10).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=10))]
    pub max_degree: u8,

    /// Plot the best model.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, env = "CURVEFIT_PLOT_WIDTH", default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "CURVEFIT_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `curvefit fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, env = "CURVEFIT_PLOT_WIDTH", default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "CURVEFIT_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,

    /// Render to an SVG file instead of the terminal.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for `sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Generating model.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,

    /// Polynomial degree (2-10). Ignored for other models.
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u8).range(2..=10))]
    pub degree: Option<u8>,

    /// Model parameters in formula order, comma separated (e.g. `2,0.5`).
    #[arg(
        long,
        value_delimiter = ',',
        required = true,
        allow_hyphen_values = true
    )]
    pub params: Vec<f64>,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Smallest x.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Largest x.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Relative Gaussian noise level (0 for exact model values).
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output file (stdout when omitted).
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Field delimiter of the written table.
    #[arg(long, env = "CURVEFIT_DELIMITER", default_value_t = ',')]
    pub delimiter: char,
}

/// Options for the interactive TUI.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Start in file mode with this table loaded.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Field delimiter of table files.
    #[arg(long, env = "CURVEFIT_DELIMITER", default_value_t = ',')]
    pub delimiter: char,

    /// Preselected model.
    #[arg(short = 'm', long, value_enum, env = "CURVEFIT_MODEL")]
    pub model: Option<ModelKind>,

    /// Preselected polynomial degree (2-10).
    #[arg(
        short = 'd',
        long,
        env = "CURVEFIT_DEGREE",
        value_parser = clap::value_parser!(u8).range(2..=10)
    )]
    pub degree: Option<u8>,

    /// Write logs to this file (the terminal is owned by the UI).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fit_accepts_repeated_points() {
        let cli = Cli::parse_from([
            "curvefit", "fit", "-p", "1,2", "-p", "-2,4", "--model", "linear",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input.points, vec!["1,2", "-2,4"]);
        assert_eq!(args.model, Some(ModelKind::Linear));
    }

    #[test]
    fn degree_outside_range_is_rejected() {
        let err = Cli::try_parse_from(["curvefit", "fit", "--degree", "11"]);
        assert!(err.is_err());
    }

    #[test]
    fn sample_params_accept_negatives() {
        let cli = Cli::parse_from([
            "curvefit", "sample", "-m", "linear", "--params", "-1.5,2", "--x-min", "-3",
        ]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.params, vec![-1.5, 2.0]);
        assert_eq!(args.x_min, -3.0);
    }

    #[test]
    fn file_and_points_conflict() {
        let err = Cli::try_parse_from(["curvefit", "fit", "-f", "a.csv", "-p", "1,2"]);
        assert!(err.is_err());
    }
}
