//! DialogChain CLI - Command-line interface for dialog files

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "dialogchain")]
#[command(about = "DialogChain: BG3 dialog LSX tools", long_about = None)]
#[command(version = crate::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the DialogChain CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
