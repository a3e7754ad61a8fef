//! Place search, details, and photo calls.
//!
//! Every per-record API outcome is folded into an `Option`/`bool` here so the
//! driver only ever sees "matched or not". Filesystem errors are the exception
//! and propagate.
use super::credentials::{redact_key, ApiKey};
use super::transport::Transport;
use crate::enrich::Endpoints;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use url::Url;

/// Fields requested from the details endpoint.
pub const DETAIL_FIELDS: &[&str] = &[
    "photos",
    "name",
    "formatted_address",
    "formatted_phone_number",
    "international_phone_number",
    "geometry",
    "rating",
    "user_ratings_total",
    "reviews",
    "opening_hours",
    "website",
    "price_level",
    "business_status",
];

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    place_id: String,
}

/// Client for the three place endpoints, bound to one transport and key.
pub struct PlacesClient<T> {
    transport: T,
    api_key: ApiKey,
    endpoints: Endpoints,
}

impl<T: Transport> PlacesClient<T> {
    pub fn new(transport: T, api_key: ApiKey, endpoints: Endpoints) -> Self {
        Self {
            transport,
            api_key,
            endpoints,
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Return the first candidate's place id for `"<name>, <address>"`.
    ///
    /// Non-200 statuses, empty candidate lists, unparseable bodies, and
    /// transport failures all come back as `None`.
    pub fn find_place_id(&self, name: &str, address: &str) -> Result<Option<String>> {
        let input = format!("{name}, {address}");
        let url = endpoint_url(
            &self.endpoints.search_url,
            &[
                ("input", input.as_str()),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
                ("key", self.api_key.expose()),
            ],
        )?;
        tracing::info!(name, address, "searching place");

        let response = match self.transport.fetch(&url) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "place search failed");
                return Ok(None);
            }
        };
        tracing::info!(status = response.status, "place search responded");
        if !response.is_ok() {
            tracing::warn!(
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "place search returned an error status"
            );
            return Ok(None);
        }

        let parsed: FindPlaceResponse = match serde_json::from_slice(&response.body) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(error = %err, "place search body is not a candidate list");
                return Ok(None);
            }
        };
        tracing::info!(
            name,
            candidates = parsed.candidates.len(),
            "place candidates found"
        );
        match parsed.candidates.into_iter().next() {
            Some(candidate) => {
                tracing::info!(place_id = %candidate.place_id, "best matching place");
                Ok(Some(candidate.place_id))
            }
            None => {
                tracing::info!(name, "no matching place");
                Ok(None)
            }
        }
    }

    /// Fetch the details body for `place_id`, unfiltered.
    ///
    /// Any JSON body is returned whatever its HTTP or embedded status; only a
    /// transport failure or a non-JSON body yields `None`.
    pub fn fetch_details(&self, place_id: &str) -> Result<Option<Value>> {
        let fields = DETAIL_FIELDS.join(",");
        let url = endpoint_url(
            &self.endpoints.details_url,
            &[
                ("place_id", place_id),
                ("fields", fields.as_str()),
                ("key", self.api_key.expose()),
            ],
        )?;
        tracing::info!(place_id, "fetching place details");

        let response = match self.transport.fetch(&url) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(place_id, error = %format!("{err:#}"), "details fetch failed");
                return Ok(None);
            }
        };
        let details: Value = match serde_json::from_slice(&response.body) {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(
                    place_id,
                    status = response.status,
                    error = %err,
                    "details body is not JSON"
                );
                return Ok(None);
            }
        };
        if let Some(status) = details.get("status").and_then(Value::as_str) {
            if status != "OK" {
                tracing::warn!(place_id, status, "details response carries a non-OK status");
            }
        }
        Ok(Some(details))
    }

    /// Build the photo fetch URL for `reference`.
    pub fn photo_url(&self, reference: &str, max_width: u32) -> Result<Url> {
        let width = max_width.to_string();
        endpoint_url(
            &self.endpoints.photo_url,
            &[
                ("maxwidth", width.as_str()),
                ("photoreference", reference),
                ("key", self.api_key.expose()),
            ],
        )
    }

    /// Download one photo to `dest`; `true` only when bytes were written.
    pub fn download_photo(&self, reference: &str, max_width: u32, dest: &Path) -> Result<bool> {
        let url = self.photo_url(reference, max_width)?;
        tracing::info!(url = %redact_key(&url), "downloading photo");

        let response = match self.transport.fetch(&url) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "photo download failed");
                return Ok(false);
            }
        };
        if !response.is_ok() {
            tracing::warn!(status = response.status, "photo download failed");
            return Ok(false);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(dest, &response.body).with_context(|| format!("write {}", dest.display()))?;
        tracing::info!(path = %dest.display(), bytes = response.body.len(), "photo saved");
        Ok(true)
    }
}

/// Reference token of the first photo in a details body, if any.
pub fn first_photo_reference(details: &Value) -> Option<&str> {
    details
        .get("result")?
        .get("photos")?
        .as_array()?
        .first()?
        .get("photo_reference")?
        .as_str()
}

fn endpoint_url(base: &str, params: &[(&str, &str)]) -> Result<Url> {
    let url = Url::parse_with_params(base, params)
        .with_context(|| format!("build request URL from {base:?}"))?;
    Ok(url)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
