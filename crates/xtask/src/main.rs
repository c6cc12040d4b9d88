//! Development tasks for the combat workspace
//!
//! This binary provides content tooling using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CheckContent, PreviewArea};

/// Development tasks for the combat workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Content tools for combat definitions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Render the directional variants of a spell's shape
    PreviewArea(PreviewArea),

    /// Load and validate combat content files
    CheckContent(CheckContent),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::PreviewArea(cmd) => cmd.execute(),
        Command::CheckContent(cmd) => cmd.execute(),
    }
}
