use bytescope_cli::commands::{Cmd, Command};
use clap::Parser;
use tracing::Level;

/// bytescope CLI
///
/// Decodes EVM bytecode into instructions and derives read-only views from them: annotated
/// disassembly, an instruction tree, candidate function segments, reconstructed events, the
/// selector dispatcher and search queries.
#[derive(Parser)]
#[command(name = "bytescope")]
#[command(about = "bytescope: EVM bytecode decoder and inspector")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Runs the bytescope CLI with the provided arguments.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .init();

    cli.command.execute().await
}
