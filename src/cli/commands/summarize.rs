//! Summarize command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, SummarySource};
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(input: &str, refresh: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    if refresh {
        orchestrator.invalidate(input).await?;
    }

    let spinner = Output::spinner("Summarizing...");

    match orchestrator.summarize(input).await {
        Ok(outcome) => {
            spinner.finish_and_clear();

            println!("\n{}\n", outcome.summary);

            let source = match outcome.source {
                SummarySource::Cache => "cache",
                SummarySource::Catalog => "catalog",
                SummarySource::Computed => "computed",
            };
            Output::kv("Video", &outcome.video_id);
            Output::kv("Source", source);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Summarization failed: {}", e));
            Err(e.into())
        }
    }
}
