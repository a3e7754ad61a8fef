//! Per-record enrichment driver.
//!
//! Each record moves through search, details, and photo download in order and
//! ends either found or not-found. Records are processed strictly one at a
//! time with a fixed pause after each, whatever the outcome.
use crate::cli::RunArgs;
use crate::dataset::{self, PlaceRecord, PlaceTable, RecordLimit};
use crate::enrich::{self, EnrichConfig, ImageStatus, OutputPaths, RunSummary};
use crate::places::{
    first_photo_reference, ApiKey, HttpTransport, Pacer, PlacesClient, ThreadPacer, Transport,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Run the enrich step against the live API.
pub fn run_enrich(args: &RunArgs) -> Result<()> {
    let mut config = super::resolve_config(args.config.as_deref())?;
    if let Some(source) = &args.source {
        config.source = source.clone();
    }
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }
    if let Some(pacing_ms) = args.pacing_ms {
        config.pacing_ms = pacing_ms;
    }
    enrich::validate_config(&config)?;

    let transport = HttpTransport::new(config.request_timeout_secs.map(Duration::from_secs));
    let api_key = ApiKey::from_env(&config.api_key_env);
    let client = PlacesClient::new(transport, api_key, config.endpoints.clone());
    let summary = enrich_dataset(&config, client, ThreadPacer, args.limit)?;

    println!(
        "processed {} records: {} with images, {} without ({} unresolved)",
        summary.processed, summary.found, summary.not_found, summary.unresolved
    );
    println!(
        "wrote {}",
        OutputPaths::new(config.out_dir.clone()).table_path().display()
    );
    Ok(())
}

/// Terminal outcome of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    Unresolved,
    NoDetails,
    NoPhoto,
    ImageFailed,
    ImageSaved,
}

impl RecordOutcome {
    fn status(self) -> ImageStatus {
        match self {
            RecordOutcome::ImageSaved => ImageStatus::Found,
            _ => ImageStatus::NotFound,
        }
    }

    fn wrote_details(self) -> bool {
        matches!(
            self,
            RecordOutcome::NoPhoto | RecordOutcome::ImageFailed | RecordOutcome::ImageSaved
        )
    }
}

/// Drives the place client over a filtered table.
pub struct Enricher<T, P> {
    client: PlacesClient<T>,
    pacer: P,
    paths: OutputPaths,
    image_max_width: u32,
    pacing: Duration,
}

impl<T: Transport, P: Pacer> Enricher<T, P> {
    pub fn new(
        client: PlacesClient<T>,
        pacer: P,
        paths: OutputPaths,
        image_max_width: u32,
        pacing: Duration,
    ) -> Self {
        Self {
            client,
            pacer,
            paths,
            image_max_width,
            pacing,
        }
    }

    #[cfg(test)]
    pub fn client(&self) -> &PlacesClient<T> {
        &self.client
    }

    #[cfg(test)]
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Enrich the first `limit` records and hand back the annotated table.
    ///
    /// Records past the bound keep their not-found default and lose any image
    /// left by an earlier run. Only filesystem errors abort the run.
    pub fn run(
        &self,
        mut table: PlaceTable,
        limit: RecordLimit,
    ) -> Result<(PlaceTable, RunSummary)> {
        let bound = limit.bound(table.len());
        if table.is_empty() {
            tracing::info!("no eligible records");
        } else {
            tracing::info!(total = table.len(), bound, "enriching records");
        }

        let mut summary = RunSummary::default();
        let (processed, skipped) = table.records.split_at_mut(bound);
        for record in processed {
            let outcome = self.enrich_record(record)?;
            record.status = outcome.status();
            tally(&mut summary, outcome);
            tracing::info!(row = record.position, status = %record.status, "record done");
            self.pacer.pause(self.pacing);
        }
        for record in skipped.iter() {
            remove_stale(&self.paths.image_path(record.position))?;
        }
        Ok((table, summary))
    }

    fn enrich_record(&self, record: &PlaceRecord) -> Result<RecordOutcome> {
        let row = record.position;
        tracing::info!(row, name = %record.name, address = %record.address, "processing record");

        let outcome = self.resolve_and_fetch(record)?;
        if !outcome.wrote_details() {
            remove_stale(&self.paths.details_path(row))?;
        }
        if outcome.status() == ImageStatus::NotFound {
            remove_stale(&self.paths.image_path(row))?;
        }
        Ok(outcome)
    }

    fn resolve_and_fetch(&self, record: &PlaceRecord) -> Result<RecordOutcome> {
        let row = record.position;
        let Some(place_id) = self.client.find_place_id(&record.name, &record.address)? else {
            return Ok(RecordOutcome::Unresolved);
        };
        let Some(details) = self.client.fetch_details(&place_id)? else {
            return Ok(RecordOutcome::NoDetails);
        };

        let details_path = self.paths.details_path(row);
        write_details(&details_path, &details)?;
        tracing::info!(row, path = %details_path.display(), "details saved");

        let Some(reference) = first_photo_reference(&details) else {
            tracing::info!(row, place_id = %place_id, "place has no photos");
            return Ok(RecordOutcome::NoPhoto);
        };
        let image_path = self.paths.image_path(row);
        if self
            .client
            .download_photo(reference, self.image_max_width, &image_path)?
        {
            Ok(RecordOutcome::ImageSaved)
        } else {
            Ok(RecordOutcome::ImageFailed)
        }
    }
}

fn tally(summary: &mut RunSummary, outcome: RecordOutcome) {
    summary.processed += 1;
    match outcome.status() {
        ImageStatus::Found => summary.found += 1,
        ImageStatus::NotFound => summary.not_found += 1,
    }
    if outcome == RecordOutcome::Unresolved {
        summary.unresolved += 1;
    }
    if outcome.wrote_details() {
        summary.details_written += 1;
    }
}

/// Pretty JSON, 4-space indent, key order and non-ASCII text kept as-is.
fn write_details(path: &Path, details: &Value) -> Result<()> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    details
        .serialize(&mut serializer)
        .context("serialize place details")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, &bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed stale artifact");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
    }
}

/// Load, enrich, and persist the output table for one config.
pub fn enrich_dataset<T: Transport, P: Pacer>(
    config: &EnrichConfig,
    client: PlacesClient<T>,
    pacer: P,
    limit: RecordLimit,
) -> Result<RunSummary> {
    let table = dataset::load_filtered(&config.source, &config.columns)?;
    let paths = OutputPaths::new(config.out_dir.clone());
    let enricher = Enricher::new(
        client,
        pacer,
        paths.clone(),
        config.image_max_width,
        Duration::from_millis(config.pacing_ms),
    );

    let (table, summary) = enricher.run(table, limit)?;

    let table_path = paths.table_path();
    dataset::write_output(&table_path, &table)?;
    tracing::info!(
        path = %table_path.display(),
        rows = table.len(),
        processed = summary.processed,
        found = summary.found,
        not_found = summary.not_found,
        unresolved = summary.unresolved,
        "output table saved"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
