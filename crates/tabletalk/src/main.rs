// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tabletalk - a conversational data assistant over DynamoDB.
//!
//! This is the binary entry point for the Tabletalk service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod config;
mod serve;

/// Tabletalk - a conversational data assistant over DynamoDB.
#[derive(Parser, Debug)]
#[command(name = "tabletalk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Tabletalk chat API server.
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match tabletalk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tabletalk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => config::run_config(&config),
        None => {
            println!("tabletalk: use --help for available commands");
        }
    }
}
