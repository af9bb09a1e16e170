use std::io::IsTerminal;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use miette::{IntoDiagnostic, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Inspect, extract and patch the Wwise audio of Stingray game archives
#[derive(Parser)]
#[command(name = "stingray", version, propagate_version = true)]
#[command(
    long_about = "Inspect, extract and patch the Wwise audio of Stingray game archives.\n\n\
    An archive is a TOC file next to its `.stream` file. Banks, streamed audio and \
    localized strings are read from both, edited together, and written back as a \
    patch holding only what changed."
)]
struct Cli {
    #[command(subcommand)]
    command: stingray::commands::Commands,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

/// Logs go to stderr so that commands printing JSON can be piped
fn init_logging(level: LevelFilter) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init()
        .into_diagnostic()
}

fn main() -> Result<()> {
    better_panic::install();

    let cli = Cli::parse();

    // the verbosity flag speaks `log` levels
    let level = cli
        .verbose
        .log_level_filter()
        .as_str()
        .parse::<LevelFilter>()
        .into_diagnostic()?;
    init_logging(level)?;

    cli.command.handle()
}
