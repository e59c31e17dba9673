//! Xuckoo - Main entrypoint.
//!
//! Loads configuration, initializes logging and runs the requested command.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use xuckoo_lib::config::{self, ConfigLoader, LogConfig, XuckooConfig, ENV_PREFIX};
use xuckoo_lib::data_structures::xuckoo_hash::{XuckooHashConfig, XuckooHashTable};
use xuckoo_lib::error::{
    report_error, set_error_reporter, ErrorContext, TracingErrorReporter, XuckooError,
    XuckooResult,
};
use xuckoo_lib::script::run_script;

/// Command line arguments for Xuckoo.
#[derive(Parser, Debug)]
#[clap(name = "xuckoo", version, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run a command script against a fresh table
    Run {
        /// Script file; standard input when omitted
        #[clap(short, long, value_parser)]
        script: Option<PathBuf>,

        /// Print the final statistics report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system. Logs go to standard error so that script
/// output on standard output stays clean.
fn init_logging(log: &LogConfig) -> XuckooResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let fmt_layer = if log.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_file(log.source_location)
            .with_line_number(log.source_location)
            .with_writer(io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_file(log.source_location)
            .with_line_number(log.source_location)
            .with_writer(io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .map_err(|e| XuckooError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Runs a script against a table built from the global configuration.
fn run(script: Option<PathBuf>, json: bool) -> XuckooResult<()> {
    let config = config::get_global_config();
    let table_config = &config.get().table;
    let mut table = XuckooHashTable::with_hasher_and_config(
        table_config.hasher,
        XuckooHashConfig::from(table_config),
    );

    let input: Box<dyn BufRead> = match &script {
        Some(path) => Box::new(BufReader::new(fs::File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_script(&mut table, input, &mut out)?;

    if json {
        serde_json::to_writer_pretty(&mut out, &table.report())?;
        writeln!(out)?;
    }

    let released = table.destroy();
    info!(
        commands = summary.commands,
        buckets_released = released.total(),
        "run complete"
    );
    Ok(())
}

/// Main entry point for the application.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);
    let config = config_loader
        .load()
        .context("failed to load configuration")?;

    init_logging(&config.log)?;
    set_error_reporter(Arc::new(TracingErrorReporter));

    match args.command.unwrap_or(Command::Run {
        script: None,
        json: false,
    }) {
        Command::Run { script, json } => {
            config::init_global_config(config);

            let span = tracing::info_span!("run", script = ?script);
            let _entered = span.enter();
            if let Err(e) = run(script, json) {
                report_error(ErrorContext::new(e, "run").with_span_trace());
                process::exit(1);
            }
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            let default_config = XuckooConfig::default();

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .context("failed to serialize default configuration")?;
            fs::write(&output, toml)
                .with_context(|| format!("failed to write {}", output.display()))?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
