//! dotbox CLI - Command-line interface
//!
//! Commands:
//! - play: interactive game against the computer
//! - sim: headless self-play with statistics

mod play;
mod render;
mod sim;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dotbox")]
#[command(about = "Dots-and-boxes against a heuristic computer opponent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively against the computer
    Play(play::PlayArgs),
    /// Run headless self-play games
    Sim(sim::SimArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args).await,
        Commands::Sim(args) => sim::run(args),
    }
}
