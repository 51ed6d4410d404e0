//! Vidsum - Video Transcript Summarization
//!
//! A service that turns a video identifier into an AI-generated summary of
//! its transcript, backed by a persistent catalog and a TTL cache so repeated
//! requests never recompute work that is already done.
//!
//! # Overview
//!
//! Given a video URL or bare identifier, Vidsum:
//! - Resolves canonical video metadata and keeps one catalog record per video
//! - Fetches the transcript and summarizes it with an LLM, exactly once
//! - Memoizes the result in a TTL cache, and falls back to the catalog copy
//!   when the cache has expired or is unavailable
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video` - Video metadata provider abstraction and id extraction
//! - `transcript` - Transcript provider abstraction
//! - `summarize` - Summarization engine abstraction
//! - `catalog` - Persistent video record store
//! - `cache` - Best-effort TTL cache for computed summaries
//! - `orchestrator` - The get-or-create-or-compute workflow
//!
//! # Example
//!
//! ```rust,no_run
//! use vidsum::config::Settings;
//! use vidsum::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let outcome = orchestrator.summarize("dQw4w9WgXcQ").await?;
//!     println!("{}", outcome.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod summarize;
pub mod transcript;
pub mod video;

pub use error::{Result, VidsumError};
