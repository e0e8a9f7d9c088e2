// src/scrape.rs
//
// Collector pipeline:
//
//   load previous snapshot ─┐
//   fetch page → parse ─────┴→ resolve one at a time → save snapshot
//
// Page fetch errors abort before anything is written. Per-entry failures
// become `Unresolved` and the run goes on.

use std::future::Future;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::CollectOptions;
use crate::core::net;
use crate::data::{CenterEntry, Coordinates, RawEntry, Snapshot};
use crate::error::{Error, Result};
use crate::geocode::{Geocoder, GoogleGeocoder};
use crate::progress::Progress;
use crate::resolve::{resolve_entry, CoordinateCache};
use crate::specs::testing_sites;
use crate::store;

/// Run `f` over `items` strictly in order; item i starts after item i-1 finished.
pub async fn resolve_sequential<'a, T, R, F, Fut>(
    items: &'a [T],
    progress: &mut dyn Progress,
    mut f: F,
) -> Vec<R>
where
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    progress.begin(items.len());
    let mut results = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        results.push(f(item).await);
        progress.item_done(i + 1);
    }
    progress.finish();
    results
}

/// Geocode every entry against `previous` and assemble a fresh snapshot.
pub async fn build_snapshot(
    entries: &[RawEntry],
    previous: &Snapshot,
    geocoder: &dyn Geocoder,
    progress: &mut dyn Progress,
) -> Snapshot {
    let cache = CoordinateCache::new(previous);
    progress.log(&format!("Geocoding {} items...", entries.len()));
    let centers = resolve_sequential(entries, progress, |e| resolve_entry(e, cache, geocoder)).await;
    Snapshot::new(centers)
}

/// Stand-in when no API key is configured: cache hits still resolve.
struct NoGeocoder;

#[async_trait]
impl Geocoder for NoGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Coordinates> {
        Err(Error::MissingApiKey)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSummary {
    pub path: PathBuf,
    pub total: usize,
    pub resolved: usize,
    /// `(position, name, reason)` for every unresolved entry.
    pub failed: Vec<(usize, String, String)>,
}

impl CollectSummary {
    pub fn unresolved(&self) -> usize {
        self.total - self.resolved
    }
}

/// One full collector run.
pub async fn collect(opts: &CollectOptions, progress: &mut dyn Progress) -> Result<CollectSummary> {
    let previous = store::load_snapshot(&opts.data_file);
    let client = net::client(opts.geocoder.timeout)?;

    let html = net::http_get(&client, &opts.page_url)
        .await
        .inspect_err(|e| error!(error = %e, "page fetch failed; nothing written"))?;
    let entries = testing_sites::parse(&html)?;
    info!(url = %opts.page_url, entries = entries.len(), "scraped page");
    progress.log(&format!("Scraping {} items...", entries.len()));

    let google;
    let geocoder: &dyn Geocoder = match opts.geocoder.api_key {
        Some(_) => {
            google = GoogleGeocoder::new(client, &opts.geocoder)?;
            &google
        }
        None => {
            warn!("no geocoding API key; only cached addresses will resolve");
            &NoGeocoder
        }
    };

    let snapshot = build_snapshot(&entries, &previous, geocoder, progress).await;
    let summary = CollectSummary {
        path: opts.data_file.clone(),
        total: snapshot.centers.len(),
        resolved: snapshot.resolved_count(),
        failed: failures(&snapshot)
            .map(|(i, name, reason)| (i, name.to_string(), reason.to_string()))
            .collect(),
    };

    store::save_snapshot(&opts.data_file, &snapshot).inspect_err(|e| {
        warn!(error = %e, "could not write snapshot; previous file left in place");
    })?;
    info!(
        path = %summary.path.display(),
        resolved = summary.resolved,
        unresolved = summary.unresolved(),
        "Successfully written data to file"
    );
    Ok(summary)
}

/// Entries whose positions came back unresolved, with their reasons.
pub fn failures(snapshot: &Snapshot) -> impl Iterator<Item = (usize, &str, &str)> {
    snapshot.centers.iter().enumerate().filter_map(|(i, e)| match e {
        CenterEntry::Unresolved(u) => Some((i, u.name.as_str(), u.reason.as_str())),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        done: Vec<usize>,
        finished: bool,
    }

    impl Progress for Recorder {
        fn begin(&mut self, total: usize) { self.total = Some(total); }
        fn item_done(&mut self, done: usize) { self.done.push(done); }
        fn finish(&mut self) { self.finished = true; }
    }

    #[tokio::test]
    async fn progress_counts_one_to_n() {
        let items = [10, 20, 30];
        let mut rec = Recorder::default();
        let out = resolve_sequential(&items[..], &mut rec, |n| async move { n * 2 }).await;
        assert_eq!(out, vec![20, 40, 60]);
        assert_eq!(rec.total, Some(3));
        assert_eq!(rec.done, vec![1, 2, 3]);
        assert!(rec.finished);
    }

    #[tokio::test]
    async fn empty_input_still_finishes() {
        let items: [u8; 0] = [];
        let mut rec = Recorder::default();
        let out: Vec<u8> = resolve_sequential(&items[..], &mut rec, |n| async move { *n }).await;
        assert!(out.is_empty());
        assert!(rec.done.is_empty());
        assert!(rec.finished);
    }

    #[tokio::test]
    async fn without_a_key_only_cache_hits_resolve() {
        let entries = vec![
            RawEntry::untagged("A\n1 A St\nQueens, NY"),
            RawEntry::untagged("B\n2 B St\nQueens, NY"),
        ];
        let previous = Snapshot::new(vec![CenterEntry::Resolved(crate::data::Center {
            name: "A".into(),
            address: vec!["1 A St".into(), "Queens, NY".into()],
            borough: None,
            site_type: None,
            test_type: None,
            coordinates: Some(Coordinates { lat: 1.0, lng: 1.0 }),
            context: vec![],
        })]);

        let snap = build_snapshot(&entries, &previous, &NoGeocoder, &mut NullProgress).await;
        assert!(snap.centers[0].is_resolved());
        let f: Vec<_> = failures(&snap).collect();
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].0, 1);
        assert_eq!(f[0].1, "B");
    }
}
