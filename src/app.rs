//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - acquires data (table file or `--point` entries)
//! - runs the fit pipeline or model comparison
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CompareArgs, FitArgs, InputArgs, PlotArgs, SampleArgs, TuiArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::debug::{DEBUG_DIR, write_debug_bundle};
use crate::domain::{DataSet, FitConfig};
use crate::error::AppError;
use crate::fit::compare_models;
use crate::io::{read_curve_json, write_curve_json, write_residuals_csv, write_table};
use crate::plot::{ChartData, DEFAULT_SVG_SIZE, render_ascii, write_svg};
use crate::report::{
    format_comparison, format_curve_summary, format_dataset_line, format_entry_notes,
    format_fit_summary,
};

pub mod pipeline;

/// Entry point for the `curvefit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `curvefit` and `curvefit -f data.csv` behave like `curvefit tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match &cli.command {
        Command::Tui(args) => init_file_logging(args.log_file.as_deref(), cli.verbose)?,
        _ => init_logging(cli.verbose),
    }

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Compare(args) => handle_compare(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Log to stderr (CLI commands).
fn init_logging(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Log to a file, or not at all (the TUI owns the terminal).
fn init_file_logging(path: Option<&Path>, verbose: u8) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create log file '{}': {e}", path.display())))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Data for `fit`/`compare` from `--file` or `--point`.
fn load_input(input: &InputArgs) -> Result<DataSet, AppError> {
    if let Some(path) = &input.file {
        let delimiter = pipeline::delimiter_byte(input.delimiter)?;
        return pipeline::load_file(path, delimiter);
    }
    let report = pipeline::entry_table_from_points(&input.points).to_report();
    let notes = format_entry_notes(&report);
    if !notes.is_empty() {
        eprint!("{notes}");
    }
    pipeline::entry_dataset(&report)
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let data = load_input(&args.input)?;

    if config.debug {
        let path = write_debug_bundle(Path::new(DEBUG_DIR), &data, config.request.as_ref())?;
        eprintln!("Debug bundle: {}", path.display());
    }

    let result = pipeline::evaluate(&data, config.request.as_ref()).into_result()?;

    println!("{}", format_dataset_line(&data));
    println!("{}", format_fit_summary(&result));

    let chart = ChartData::for_fit(&data, &result);
    if config.plot {
        println!("{}", render_ascii(&chart, config.plot_width, config.plot_height));
    }

    // Optional exports.
    if let Some(path) = &config.svg {
        write_svg(path, &chart, DEFAULT_SVG_SIZE)?;
    }
    if let Some(path) = &config.export_residuals {
        write_residuals_csv(path, &data, &result)?;
    }
    if let Some(path) = &config.export_curve {
        write_curve_json(path, &result, &data)?;
    }

    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let data = load_input(&args.input)?;
    let cmp = compare_models(&data, args.max_degree)?;

    println!("{}", format_dataset_line(&data));
    println!("{}", format_comparison(&cmp));

    if let Some(best) = cmp.best() {
        println!("Best model: {}", best.request.label());
        println!("{}", format_fit_summary(best));
        if args.plot {
            let chart = ChartData::for_fit(&data, best);
            println!("{}", render_ascii(&chart, args.width, args.height));
        }
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = read_curve_json(&args.curve)?;
    let chart = ChartData::from_curve_file(&curve);

    println!("{}", format_curve_summary(&curve));
    match &args.svg {
        Some(path) => write_svg(path, &chart, DEFAULT_SVG_SIZE)?,
        None => println!("{}", render_ascii(&chart, args.width, args.height)),
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let request = pipeline::resolve_request(Some(args.model), args.degree)?
        .ok_or_else(|| AppError::incomplete(pipeline::PROMPT_MESSAGE))?;
    let config = SampleConfig {
        request,
        params: args.params.clone(),
        count: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let data = generate_sample(&config)?;
    let delimiter = pipeline::delimiter_byte(args.delimiter)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AppError::io(format!("Failed to create '{}': {e}", path.display()))
            })?;
            write_table(file, &data, delimiter)?;
            info!(path = %path.display(), n = data.len(), "sample written");
        }
        None => write_table(io::stdout().lock(), &data, delimiter)?,
    }
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    Ok(FitConfig {
        request: pipeline::resolve_request(args.model, args.degree)?,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg: args.svg.clone(),
        export_residuals: args.export.clone(),
        export_curve: args.export_curve.clone(),
        debug: args.debug,
    })
}

/// Rewrite argv so `curvefit` defaults to `curvefit tui`.
///
/// Rules:
/// - `curvefit`                      -> `curvefit tui`
/// - `curvefit -f data.csv ...`      -> `curvefit tui -f data.csv ...`
/// - `curvefit -v fit ...`           -> unchanged (verbosity is global)
/// - `curvefit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(first) = argv.iter().skip(1).position(|a| !is_verbosity_flag(a)) else {
        argv.push("tui".to_string());
        return argv;
    };
    let idx = first + 1;
    let arg = argv[idx].as_str();

    let is_top_level_help_or_version =
        matches!(arg, "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg, "fit" | "compare" | "plot" | "sample" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg.starts_with('-') {
        argv.insert(idx, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is (clap reports the unknown subcommand).
    argv
}

fn is_verbosity_flag(arg: &str) -> bool {
    arg == "--verbose"
        || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["curvefit"])), argv(&["curvefit", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["curvefit", "-v"])),
            argv(&["curvefit", "-v", "tui"])
        );
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["curvefit", "-f", "a.csv"])),
            argv(&["curvefit", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["curvefit", "fit", "-p", "1,2"][..],
            &["curvefit", "-vv", "compare"][..],
            &["curvefit", "--help"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(3), "debug");
    }
}
