//! Summarization orchestrator for Vidsum.
//!
//! Implements the get-or-create-or-compute workflow: cache lookup, catalog
//! resolution (creating the record from provider metadata on first sight),
//! transcript fetch, LLM summarization, catalog write, cache population.
//! Each step depends on the previous one's result, so within a request the
//! order is fixed; across requests a per-video single-flight registry keeps
//! concurrent callers from duplicating the expensive provider calls.

use crate::cache::{summary_key, MemoryCache, NoopCache, SqliteCache, SummaryCache};
use crate::catalog::{CatalogStore, MemoryCatalog, SqliteCatalog, VideoRecord};
use crate::config::Settings;
use crate::error::{Result, VidsumError};
use crate::summarize::{OpenAiSummarizer, Summarizer};
use crate::transcript::{TimedTextProvider, TranscriptProvider};
use crate::video::{extract_video_id, MetadataProvider, YoutubeMetadataProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};

/// Serialized cache payload for a computed summary.
#[derive(Debug, Serialize, Deserialize)]
struct SummaryPayload {
    summary: String,
}

/// Where a returned summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// Served straight from the cache.
    Cache,
    /// Cache had expired but the catalog still held the computed summary.
    Catalog,
    /// Computed fresh through transcript fetch and summarization.
    Computed,
}

/// Result of a summarize call.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// The resolved external video id.
    pub video_id: String,
    /// The summary text.
    pub summary: String,
    /// Which layer satisfied the request.
    pub source: SummarySource,
}

/// Outcome of resolving a video id against the catalog.
enum CatalogLookup {
    /// The record already existed.
    Found(VideoRecord),
    /// The record was created from provider metadata just now.
    Created(VideoRecord),
}

impl CatalogLookup {
    fn into_record(self) -> VideoRecord {
        match self {
            CatalogLookup::Found(record) | CatalogLookup::Created(record) => record,
        }
    }
}

type FlightMap = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>;

/// Per-key in-flight computation registry.
///
/// `join` hands out a guard once no other caller holds the same key, so
/// concurrent requests for one video serialize instead of racing through
/// the provider calls. Late joiners re-check cache and catalog after the
/// winner finishes, finding its result already persisted.
#[derive(Default)]
struct FlightRegistry {
    flights: FlightMap,
}

impl FlightRegistry {
    async fn join(&self, key: &str) -> Flight {
        let slot = {
            let mut flights = self.flights.lock().unwrap();
            flights.entry(key.to_string()).or_default().clone()
        };

        let permit = slot.lock_owned().await;
        Flight {
            registry: Arc::clone(&self.flights),
            key: key.to_string(),
            _permit: permit,
        }
    }
}

struct Flight {
    registry: FlightMap,
    key: String,
    _permit: OwnedMutexGuard<()>,
}

impl Drop for Flight {
    fn drop(&mut self) {
        let mut flights = self.registry.lock().unwrap();
        if let Some(slot) = flights.get(&self.key) {
            // Two references mean map + our permit: nobody else is waiting
            if Arc::strong_count(slot) == 2 {
                flights.remove(&self.key);
            }
        }
    }
}

/// The main orchestrator for the summarization pipeline.
pub struct Orchestrator {
    catalog: Arc<dyn CatalogStore>,
    cache: Arc<dyn SummaryCache>,
    metadata: Arc<dyn MetadataProvider>,
    transcripts: Arc<dyn TranscriptProvider>,
    summarizer: Arc<dyn Summarizer>,
    summary_ttl: Duration,
    flights: FlightRegistry,
}

impl Orchestrator {
    /// Create a new orchestrator with components chosen from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let catalog: Arc<dyn CatalogStore> = match settings.catalog.provider.as_str() {
            "memory" => Arc::new(MemoryCatalog::new()),
            _ => Arc::new(SqliteCatalog::new(&settings.catalog_path())?),
        };

        let cache: Arc<dyn SummaryCache> = match settings.cache.provider.as_str() {
            "memory" => Arc::new(MemoryCache::new()),
            "none" => Arc::new(NoopCache),
            _ => Arc::new(SqliteCache::new(&settings.cache_path())?),
        };

        let metadata = Arc::new(YoutubeMetadataProvider::new(&settings.youtube)?);
        let transcripts = Arc::new(TimedTextProvider::new(&settings.youtube)?);
        let summarizer = Arc::new(OpenAiSummarizer::new(&settings.summarization));

        Ok(Self::with_components(
            catalog,
            cache,
            metadata,
            transcripts,
            summarizer,
            Duration::from_secs(settings.cache.summary_ttl_seconds),
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        catalog: Arc<dyn CatalogStore>,
        cache: Arc<dyn SummaryCache>,
        metadata: Arc<dyn MetadataProvider>,
        transcripts: Arc<dyn TranscriptProvider>,
        summarizer: Arc<dyn Summarizer>,
        summary_ttl: Duration,
    ) -> Self {
        Self {
            catalog,
            cache,
            metadata,
            transcripts,
            summarizer,
            summary_ttl,
            flights: FlightRegistry::default(),
        }
    }

    /// Summarize a video given a URL or bare identifier.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn summarize(&self, input: &str) -> Result<SummaryOutcome> {
        let video_id = parse_video_id(input)?;
        let key = summary_key(&video_id);

        if let Some(outcome) = self.cached_summary(&video_id, &key).await {
            info!("Returning cached summary for video {}", video_id);
            return Ok(outcome);
        }

        // Concurrent callers for the same video share one computation
        let _flight = self.flights.join(&video_id).await;

        // The flight winner may have finished while we waited
        if let Some(outcome) = self.cached_summary(&video_id, &key).await {
            info!("Returning cached summary for video {}", video_id);
            return Ok(outcome);
        }

        let record = self.resolve_record(&video_id).await?.into_record();

        if let Some(summary) = record.summary {
            // Cache expired but the catalog copy is still valid: repopulate
            // the cache and skip transcript fetch and summarization entirely.
            debug!("Catalog already holds a summary for {}", video_id);
            self.populate_cache(&key, &summary).await;
            return Ok(SummaryOutcome {
                video_id,
                summary,
                source: SummarySource::Catalog,
            });
        }

        let transcript = self.transcripts.fetch(&video_id).await?;
        let summary = self.summarizer.summarize(&transcript, &record.title).await?;

        self.catalog.update_summary(&video_id, &summary).await?;
        self.populate_cache(&key, &summary).await;

        info!("Computed summary for video {}", video_id);
        Ok(SummaryOutcome {
            video_id,
            summary,
            source: SummarySource::Computed,
        })
    }

    /// Fetch the catalog record for a video, creating it from provider
    /// metadata on first sight.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn get_video(&self, input: &str) -> Result<VideoRecord> {
        let video_id = parse_video_id(input)?;
        Ok(self.resolve_record(&video_id).await?.into_record())
    }

    /// Drop the cached summary for a video. The catalog copy is untouched;
    /// the next summarize call repopulates the cache from it.
    pub async fn invalidate(&self, input: &str) -> Result<()> {
        let video_id = parse_video_id(input)?;
        self.cache.delete(&summary_key(&video_id)).await;
        Ok(())
    }

    /// Find the record for a video id, or create it from provider metadata.
    ///
    /// A creation race against another request loses with `Conflict`; that
    /// is absorbed here by re-reading the record the winner just wrote.
    async fn resolve_record(&self, video_id: &str) -> Result<CatalogLookup> {
        if let Some(record) = self.catalog.find_by_external_id(video_id).await? {
            return Ok(CatalogLookup::Found(record));
        }

        let metadata = self.metadata.fetch(video_id).await?;

        match self.catalog.create(video_id, &metadata).await {
            Ok(record) => {
                info!("Created catalog record for video {}", video_id);
                Ok(CatalogLookup::Created(record))
            }
            Err(VidsumError::Conflict(_)) => {
                debug!("Lost creation race for {}, re-reading", video_id);
                self.catalog
                    .find_by_external_id(video_id)
                    .await?
                    .map(CatalogLookup::Found)
                    .ok_or_else(|| {
                        VidsumError::Conflict(format!(
                            "Record for {} conflicted on create but is absent on re-read",
                            video_id
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Look up and deserialize a cached summary. Corrupt entries are
    /// dropped and treated as a miss.
    async fn cached_summary(&self, video_id: &str, key: &str) -> Option<SummaryOutcome> {
        let raw = self.cache.get(key).await?;

        match serde_json::from_str::<SummaryPayload>(&raw) {
            Ok(payload) => Some(SummaryOutcome {
                video_id: video_id.to_string(),
                summary: payload.summary,
                source: SummarySource::Cache,
            }),
            Err(e) => {
                warn!("Dropping corrupt cache entry for key {}: {}", key, e);
                self.cache.delete(key).await;
                None
            }
        }
    }

    /// Best-effort cache write; a failure degrades to "no cache next time".
    async fn populate_cache(&self, key: &str, summary: &str) {
        match serde_json::to_string(&SummaryPayload {
            summary: summary.to_string(),
        }) {
            Ok(payload) => self.cache.set(key, &payload, self.summary_ttl).await,
            Err(e) => warn!("Failed to serialize cache payload for {}: {}", key, e),
        }
    }
}

fn parse_video_id(input: &str) -> Result<String> {
    extract_video_id(input).ok_or_else(|| {
        VidsumError::InvalidInput(format!("Could not parse video identifier: {}", input))
    })
}
