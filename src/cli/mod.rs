//! Command-line interface for the movie catalog.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Movie Catalog - a small CRUD service for movies and their cast
#[derive(Parser)]
#[command(name = "movie-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create default config file
    Init,

    /// Apply pending database migrations and exit
    Migrate,

    /// List one page of the catalog, newest first
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u64,
        /// Movies per page
        #[arg(long)]
        per_page: Option<u64>,
    },

    /// Show details about a movie
    #[command(alias = "info")]
    Show {
        /// Movie ID
        id: i32,
    },

    /// Delete a movie
    #[command(alias = "rm")]
    Remove {
        /// Movie ID
        id: i32,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub use commands::*;
