//! CLI module for the activity gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Activity Gateway - cached GitHub, coding-time and photo metadata API
#[derive(Parser)]
#[command(name = "activity-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(serve::ServeArgs),
}
