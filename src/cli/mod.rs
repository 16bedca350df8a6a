//! CLI module for the answer cache service
//!
//! - `serve`: run the HTTP server

pub mod serve;

use clap::{Parser, Subcommand};

/// Two-level answer cache in front of a chat model
#[derive(Parser)]
#[command(name = "answer-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}
