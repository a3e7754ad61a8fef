//! Run configuration helpers.
//!
//! This module loads, validates, and writes the config so a run can be
//! reproduced from a single JSON document.
use super::{EnrichConfig, CONFIG_SCHEMA_VERSION};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Build the default config used when a workspace is first initialized.
pub fn default_config() -> EnrichConfig {
    EnrichConfig::default()
}

/// Load a config file; fields it omits take their defaults.
pub fn load_config(path: &Path) -> Result<EnrichConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: EnrichConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Persist a config to disk in a stable JSON format.
pub fn write_config(path: &Path, config: &EnrichConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Validate schema version, column roles, and endpoints.
pub fn validate_config(config: &EnrichConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }

    let columns = &config.columns;
    for (label, value) in [
        ("columns.name", &columns.name),
        ("columns.address", &columns.address),
        ("columns.eligibility", &columns.eligibility),
        ("columns.eligible_value", &columns.eligible_value),
        ("columns.status", &columns.status),
        ("api_key_env", &config.api_key_env),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    for (label, other) in [
        ("columns.eligibility", &columns.eligibility),
        ("columns.name", &columns.name),
        ("columns.address", &columns.address),
    ] {
        if columns.status == *other {
            return Err(anyhow!(
                "columns.status must differ from {label} (both {other:?})"
            ));
        }
    }

    if config.image_max_width == 0 {
        return Err(anyhow!("image_max_width must be positive"));
    }
    if config.request_timeout_secs == Some(0) {
        return Err(anyhow!(
            "request_timeout_secs must be positive (use null to disable)"
        ));
    }

    let endpoints = &config.endpoints;
    validate_endpoint(&endpoints.search_url, "endpoints.search_url")?;
    validate_endpoint(&endpoints.details_url, "endpoints.details_url")?;
    validate_endpoint(&endpoints.photo_url, "endpoints.photo_url")?;
    Ok(())
}

fn validate_endpoint(raw: &str, label: &str) -> Result<()> {
    let url = url::Url::parse(raw).with_context(|| format!("{label} is not a URL ({raw:?})"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "{label} must use http or https (got {:?})",
            url.scheme()
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
