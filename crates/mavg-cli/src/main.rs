use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command, value_parser};
use mavg_core::{EngineError, ProcessSummary, try_process_all};
use mavg_data::{
    DataLoadError, JsonLinesSink, RunConfig, load_config, open_events, output_path_for,
};
use tracing::{Level, error, info};

/// Anything that can stop a run after the arguments parsed.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Fully resolved parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    input: PathBuf,
    output: PathBuf,
    window_size: u32,
}

fn main() -> ExitCode {
    // Parameter errors exit with status 2 here, before any output exists.
    let matches = cli().get_matches();

    let log_level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    // A bad config file is a parameter error too, with the same status.
    let settings = match resolve(&matches) {
        Ok(settings) => settings,
        Err(e) => e.exit(),
    };

    match run(&settings) {
        Ok(summary) => {
            info!(
                events = summary.events,
                records = summary.records,
                "moving average complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    Command::new("mavg")
        .about("Trailing moving average of translation delivery times, one record per minute.")
        .arg(
            Arg::new("input_file")
                .short('i')
                .long("input_file")
                .alias("input-file")
                .required(true)
                .value_parser(existing_file)
                .help("JSON-lines file of translation_delivered events"),
        )
        .arg(
            Arg::new("window_size")
                .short('w')
                .long("window_size")
                .alias("window-size")
                .value_parser(value_parser!(u32).range(1..))
                .help("Look-back window in minutes [default: 10]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help("Output file (default: <input>_output.<ext> next to the input)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Run config in RON, TOML or JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
}

fn existing_file(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("no such file: {raw}"))
    }
}

/// Merge flags over the config file over defaults.
///
/// Config file problems come back as clap validation errors.
fn resolve(matches: &ArgMatches) -> Result<Settings, clap::Error> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)
            .map_err(|e| cli().error(ErrorKind::ValueValidation, format!("--config: {e}")))?,
        None => RunConfig::default(),
    };
    // `input_file` is required, so clap has already rejected its absence.
    let input = matches
        .get_one::<PathBuf>("input_file")
        .cloned()
        .unwrap_or_default();
    let window_size = matches
        .get_one::<u32>("window_size")
        .copied()
        .unwrap_or(config.window_size);
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .or(config.output)
        .unwrap_or_else(|| output_path_for(&input));

    Ok(Settings {
        input,
        output,
        window_size,
    })
}

fn run(settings: &Settings) -> Result<ProcessSummary, RunError> {
    info!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        window_size = settings.window_size,
        "starting moving average"
    );
    let events = open_events(&settings.input)?;
    let mut sink = JsonLinesSink::append(&settings.output)?;
    let summary = try_process_all(events, settings.window_size, &mut sink)?;
    Ok(summary)
}

// ===========================================================================
// Tests
// ===========================================================================
