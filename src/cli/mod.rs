//! CLI module

pub mod serve;

use clap::{Parser, Subcommand};

/// Astro Insight Gateway - personalized horoscope insight service
#[derive(Parser)]
#[command(name = "astro-insight-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
