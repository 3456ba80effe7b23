// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Santalink - single-use Secret Santa pairing reveal service.
//!
//! This is the binary entry point for the Santalink server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Santalink - single-use Secret Santa pairing reveal service.
#[derive(Parser, Debug)]
#[command(name = "santalink", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Santalink HTTP server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match santalink_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            santalink_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run(config).await {
                eprintln!("santalink: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => print!("{rendered}"),
                Err(e) => {
                    eprintln!("santalink: failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
