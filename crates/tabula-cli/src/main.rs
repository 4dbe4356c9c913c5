//! Tabula CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use tabula_cli::cli::{Cli, LogFormatArg, LogLevelArg};
use tabula_cli::commands::{Output, Workspace, run};
use tabula_cli::logging::{LogConfig, LogFormat, init_logging};
use tabula_cli::render::{RenderOptions, render_columns, render_view};
use tabula_core::EngineConfig;
use tabula_persistence::PersistenceError;

/// Table width when the terminal size is unknown.
const DEFAULT_WIDTH: u16 = 120;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = EngineConfig::default().with_page_size(cli.page_size);
    let mut workspace = Workspace::open(&cli.state_dir(), config);
    let exit_code = match run(&mut workspace, &cli.command) {
        Ok(outcome) => {
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            print_output(&outcome.output, render_options(&cli));
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            if let Some(hint) = error
                .downcast_ref::<PersistenceError>()
                .and_then(PersistenceError::suggestion)
            {
                eprintln!("hint: {hint}");
            }
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_output(output: &Output, options: RenderOptions) {
    match output {
        Output::View(view) => print!("{}", render_view(view, options)),
        Output::Columns(columns) => println!("{}", render_columns(columns, options)),
        Output::Csv(csv) => print!("{csv}"),
        Output::Exported { path, bytes } => {
            println!("Exported {bytes} bytes to {}", path.display());
        }
    }
}

fn render_options(cli: &Cli) -> RenderOptions {
    let styled = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };
    if styled {
        RenderOptions::styled(DEFAULT_WIDTH)
    } else {
        RenderOptions::plain()
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_timestamps = cli.log_timestamps;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
