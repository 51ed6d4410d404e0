//! Configuration module for Vidsum.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    CacheSettings, CatalogSettings, GeneralSettings, Settings, SummarizationSettings,
    YoutubeSettings,
};
