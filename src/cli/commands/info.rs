//! Info command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the info command.
pub async fn run_info(input: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching video details...");
    let record = match orchestrator.get_video(input).await {
        Ok(record) => {
            spinner.finish_and_clear();
            record
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Lookup failed: {}", e));
            return Err(e.into());
        }
    };

    Output::header(&record.title);
    Output::kv("Video", &record.external_id);
    Output::kv("Channel", &record.channel_title);
    Output::kv("Published", &record.published_at.to_rfc3339());
    Output::kv("Duration", &record.duration);
    Output::kv("Views", &record.view_count.to_string());
    Output::kv("Likes", &record.like_count.to_string());
    Output::kv(
        "Summary",
        if record.summary.is_some() {
            "computed"
        } else {
            "not yet computed"
        },
    );

    Ok(())
}
