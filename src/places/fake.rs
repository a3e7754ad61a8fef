//! Canned transport and recording pacer for network-free tests.
use super::transport::HttpResponse;
use super::{Pacer, Transport};
use crate::enrich::Endpoints;
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

pub const SEARCH_PATH: &str = "/find/json";
pub const DETAILS_PATH: &str = "/details/json";
pub const PHOTO_PATH: &str = "/photo";

pub fn test_endpoints() -> Endpoints {
    Endpoints {
        search_url: format!("http://places.test{SEARCH_PATH}"),
        details_url: format!("http://places.test{DETAILS_PATH}"),
        photo_url: format!("http://places.test{PHOTO_PATH}"),
    }
}

enum Canned {
    Respond(HttpResponse),
    Fail(String),
}

/// Serves queued responses per URL path and records every request.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<Vec<(String, VecDeque<Canned>)>>,
    calls: RefCell<Vec<Url>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(
            path,
            Canned::Respond(HttpResponse {
                status,
                body: body.into(),
            }),
        )
    }

    pub fn fail(self, path: &str, message: &str) -> Self {
        self.push(path, Canned::Fail(message.to_string()))
    }

    fn push(self, path: &str, canned: Canned) -> Self {
        {
            let mut routes = self.routes.borrow_mut();
            match routes.iter_mut().find(|(p, _)| p == path) {
                Some((_, queue)) => queue.push_back(canned),
                None => routes.push((path.to_string(), VecDeque::from([canned]))),
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|url| url.path() == path)
            .count()
    }
}

impl Transport for FakeTransport {
    fn fetch(&self, url: &Url) -> Result<HttpResponse> {
        self.calls.borrow_mut().push(url.clone());
        let mut routes = self.routes.borrow_mut();
        let canned = routes
            .iter_mut()
            .find(|(path, _)| path == url.path())
            .and_then(|(_, queue)| queue.pop_front())
            .ok_or_else(|| anyhow!("no canned response for {}", url.path()))?;
        match canned {
            Canned::Respond(response) => Ok(response),
            Canned::Fail(message) => Err(anyhow!(message)),
        }
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct RecordingPacer {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, delay: Duration) {
        self.pauses.borrow_mut().push(delay);
    }
}

/// Search body with a single candidate.
pub fn candidates_body(place_id: &str) -> String {
    serde_json::json!({
        "candidates": [{ "place_id": place_id }],
        "status": "OK"
    })
    .to_string()
}

/// Details body with the given photo references.
pub fn details_body(name: &str, photo_refs: &[&str]) -> String {
    let photos: Vec<serde_json::Value> = photo_refs
        .iter()
        .map(|r| serde_json::json!({ "height": 300, "photo_reference": r, "width": 400 }))
        .collect();
    let mut result = serde_json::json!({
        "name": name,
        "formatted_address": "대한민국 서울특별시",
        "rating": 4.5
    });
    if !photos.is_empty() {
        result["photos"] = serde_json::Value::Array(photos);
    }
    serde_json::json!({ "html_attributions": [], "result": result, "status": "OK" }).to_string()
}
