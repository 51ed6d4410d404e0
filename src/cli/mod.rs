//! CLI module for Vidsum.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Vidsum - Video Transcript Summarization
///
/// Turns a video URL or identifier into an AI-generated summary of its
/// transcript, memoizing results in a persistent catalog and a TTL cache.
#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a video's transcript
    Summarize {
        /// Video URL or bare 11-character id
        input: String,

        /// Drop any cached summary before the lookup
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show catalog details for a video, fetching metadata if unseen
    Info {
        /// Video URL or bare 11-character id
        input: String,
    },

    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8787")]
        port: u16,
    },
}
