//! Workflow entry points behind each CLI command.
//!
//! Each step resolves its config, wires real capabilities (HTTP transport,
//! thread sleep, environment key), and delegates to the testable core.
mod init;
mod run;
mod status;

pub use init::run_init;
pub use run::run_enrich;
pub use status::run_status;

use crate::enrich::{self, EnrichConfig, DEFAULT_CONFIG_PATH};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load the explicit config, else `./enrich.json` when present, else defaults.
pub(crate) fn resolve_config(explicit: Option<&Path>) -> Result<EnrichConfig> {
    let config = match explicit {
        Some(path) => enrich::load_config(path)?,
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.is_file() {
                tracing::debug!(path = %fallback.display(), "using config");
                enrich::load_config(&fallback)?
            } else {
                enrich::default_config()
            }
        }
    };
    Ok(config)
}
