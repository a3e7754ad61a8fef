//! Shared types for the enrichment config and per-record status.
//!
//! The config mirrors the JSON file written by `init` so a run is fully
//! described by one document plus the command-line overrides.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::{
    CONFIG_SCHEMA_VERSION, DEFAULT_API_KEY_ENV, DEFAULT_DETAILS_URL, DEFAULT_IMAGE_MAX_WIDTH,
    DEFAULT_PACING_MS, DEFAULT_PHOTO_URL, DEFAULT_SEARCH_URL, DEFAULT_SOURCE_CSV,
    DEFAULT_TIMEOUT_SECS,
};

/// Image status annotated on every processed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    Found,
    #[default]
    NotFound,
}

impl ImageStatus {
    /// Return the cell value written to the status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStatus::Found => "Y",
            ImageStatus::NotFound => "N",
        }
    }

    /// Parse a status cell; anything other than the found marker is not-found.
    pub fn from_cell(value: &str) -> Self {
        if value == ImageStatus::Found.as_str() {
            ImageStatus::Found
        } else {
            ImageStatus::NotFound
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column names the filter and driver read from the source table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub name: String,
    pub address: String,
    pub eligibility: String,
    pub eligible_value: String,
    pub status: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "FCLTY_NM".to_string(),
            address: "RDNMADR_NM".to_string(),
            eligibility: "PET_POSBL_AT".to_string(),
            eligible_value: "Y".to_string(),
            status: "IMG_EXIST".to_string(),
        }
    }
}

/// External place-search endpoints.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    pub search_url: String,
    pub details_url: String,
    pub photo_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            details_url: DEFAULT_DETAILS_URL.to_string(),
            photo_url: DEFAULT_PHOTO_URL.to_string(),
        }
    }
}

/// Configuration for one enrichment run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichConfig {
    pub schema_version: u32,
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub columns: ColumnNames,
    pub endpoints: Endpoints,
    pub api_key_env: String,
    pub image_max_width: u32,
    pub pacing_ms: u64,
    pub request_timeout_secs: Option<u64>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            source: PathBuf::from(DEFAULT_SOURCE_CSV),
            out_dir: PathBuf::from("."),
            columns: ColumnNames::default(),
            endpoints: Endpoints::default(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            image_max_width: DEFAULT_IMAGE_MAX_WIDTH,
            pacing_ms: DEFAULT_PACING_MS,
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub found: usize,
    pub not_found: usize,
    pub unresolved: usize,
    pub details_written: usize,
}
