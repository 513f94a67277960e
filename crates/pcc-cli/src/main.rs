use clap::{Parser, Subcommand};

use pcc_cli::commands::{export_values, import_values, output_state, run_server};
use pcc_cli::logging::{self, LogArgs};
use pcc_cli::OrBail;

/// pccserver: a self-hosted HIBP-like password-compromise-check service.
#[derive(Debug, Parser)]
#[command(name = "pccserver", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server.
    RunServer(run_server::RunServerArgs),
    /// Import a hash family from an upstream API or a local master file.
    ImportValues(import_values::ImportValuesArgs),
    /// Reassemble a sorted master file from an imported family's shards.
    ExportValues(export_values::ExportValuesArgs),
    /// Print which hash families are currently supported.
    OutputState(output_state::OutputStateArgs),
}

impl Command {
    fn log_args(&self) -> &LogArgs {
        match self {
            Command::RunServer(args) => &args.log,
            Command::ImportValues(args) => &args.log,
            Command::ExportValues(args) => &args.log,
            Command::OutputState(args) => &args.log,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.command.log_args());
    tracing::debug!(?cli, "parsed pccserver arguments");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .or_bail("failed to start async runtime");

    match cli.command {
        Command::RunServer(args) => runtime.block_on(run_server::run(args)),
        Command::ImportValues(args) => runtime.block_on(import_values::run(args)),
        Command::ExportValues(args) => export_values::run(args),
        Command::OutputState(args) => output_state::run(args),
    }
}
