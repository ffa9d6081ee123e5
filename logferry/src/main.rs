use anyhow::Context;
use clap::Parser;
use logferry_core::cli::{
    CONFIG_ERROR_EXIT, Command, FerryArgs, check, print_config_error, print_goaccess_format,
};
use logferry_core::conf::{FerryConfig, validate};
use logferry_core::ingest::{self, IngestionSummary};
use logferry_core::logging::{self, init_logging};
use logferry_core::shutdown;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "logferry",
    version,
    about = "Logferry: Caddy JSON access logs to GoAccess",
    after_help = "Run `logferry goaccess-format` for the matching goaccess invocation."
)]
struct Cli {
    #[command(flatten)]
    args: FerryArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check { plain }) => check(&cli.args, plain),

        Some(Command::GoaccessFormat { log }) => {
            print_goaccess_format(&log);
            ExitCode::SUCCESS
        }

        None => run(&cli.args),
    }
}

fn run(args: &FerryArgs) -> ExitCode {
    // Validate before any output file is created or truncated.
    let config = match args.resolve().and_then(|options| validate(&options)) {
        Ok(config) => config,
        Err(err) => {
            print_config_error(err, false);
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };

    init_logging(args.log_format.unwrap_or_else(logging::default_log_format));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logferry starting");

    match ferry(config) {
        Ok(summary) => {
            tracing::info!(
                total = summary.total,
                rejected = summary.rejected,
                termination = ?summary.termination,
                "terminating"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "logferry stopped");
            ExitCode::FAILURE
        }
    }
}

fn ferry(config: FerryConfig) -> anyhow::Result<IngestionSummary> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let signals = shutdown::cancel_on_shutdown_signal(cancel.clone());

        let result = ingest::run(config, cancel.clone()).await;

        // Releases the signal listener when ingestion ended on its own.
        cancel.cancel();
        let _ = signals.await;

        Ok(result?)
    })
}
