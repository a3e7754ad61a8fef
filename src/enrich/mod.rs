//! Run configuration, output layout, and status types.
//!
//! The enrich module centralizes defaults, path handling, and typed JSON
//! structures so every run is described by one config document.
/// Current schema version for the run config file.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Default source table, as published by the open-data portal.
pub const DEFAULT_SOURCE_CSV: &str = "KC_MTPCLT_RSTRNT_DATA_2023.csv";
/// Default config path used by `init`, `run`, and `status`.
pub const DEFAULT_CONFIG_PATH: &str = "enrich.json";
/// File name of the annotated output table.
pub const OUTPUT_TABLE_FILE: &str = "pet_friendly_places_with_images.csv";

/// Default find-place-from-text endpoint.
pub const DEFAULT_SEARCH_URL: &str =
    "https://maps.googleapis.com/maps/api/place/findplacefromtext/json";
/// Default place details endpoint.
pub const DEFAULT_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
/// Default place photo endpoint.
pub const DEFAULT_PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";
/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Maximum photo width requested from the photo endpoint.
pub const DEFAULT_IMAGE_MAX_WIDTH: u32 = 400;
/// Delay imposed after every record.
pub const DEFAULT_PACING_MS: u64 = 2000;
/// Global per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

mod config;
mod paths;
mod types;

pub use config::{default_config, load_config, validate_config, write_config};
pub use paths::OutputPaths;
pub use types::*;
