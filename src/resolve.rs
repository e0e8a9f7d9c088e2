// src/resolve.rs
//
// RawEntry → CenterEntry. Reuses coordinates from the previous snapshot when
// the address is unchanged; otherwise asks the geocoder once.

use tracing::{debug, warn};

use crate::core::sanitize::{non_empty, strip_tabs};
use crate::data::{Center, CenterEntry, Coordinates, RawEntry, Snapshot, Unresolved};
use crate::geocode::{build_query, Geocoder};

/// Site text split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteText {
    pub name: String,
    pub address: Vec<String>,
    pub context: Vec<String>,
}

impl SiteText {
    /// Line 0 is the name, lines 1-2 the address, the rest context.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_tabs(raw.trim());
        let mut lines = cleaned.split('\n');
        let name = lines.next().unwrap_or("").to_string();
        let address = lines.by_ref().take(2).map(|l| l.trim().to_string()).collect();
        let context = lines.map(|l| l.trim().to_string()).collect();
        Self { name, address, context }
    }

    pub fn has_full_address(&self) -> bool {
        self.address.len() == 2
    }
}

/// Read-only view over the previous snapshot, keyed by address.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateCache<'a> {
    previous: &'a Snapshot,
}

impl<'a> CoordinateCache<'a> {
    pub fn new(previous: &'a Snapshot) -> Self {
        Self { previous }
    }

    /// Coordinates of the first previous center with this exact address.
    ///
    /// Only the first match is consulted; if it has no coordinates the lookup misses.
    pub fn lookup(&self, address: &[String]) -> Option<Coordinates> {
        self.previous
            .resolved()
            .find(|c| c.address.as_slice() == address)
            .and_then(|c| c.coordinates)
    }
}

fn center_from(entry: &RawEntry, text: SiteText, coordinates: Coordinates) -> Center {
    Center {
        name: text.name,
        address: text.address,
        borough: non_empty(entry.borough.as_deref()),
        site_type: non_empty(entry.site_type.as_deref()),
        test_type: non_empty(entry.test_type.as_deref()),
        coordinates: Some(coordinates),
        context: text.context,
    }
}

fn unresolved(text: SiteText, reason: impl Into<String>) -> CenterEntry {
    CenterEntry::Unresolved(Unresolved {
        name: text.name,
        address: text.address,
        reason: reason.into(),
    })
}

/// Resolve one entry. Never fails: problems come back as `Unresolved`.
pub async fn resolve_entry(
    entry: &RawEntry,
    cache: CoordinateCache<'_>,
    geocoder: &dyn Geocoder,
) -> CenterEntry {
    let text = SiteText::parse(&entry.raw);

    if !text.has_full_address() {
        warn!(name = %text.name, lines = text.address.len(), "incomplete address; not geocoding");
        return unresolved(text, "incomplete address");
    }

    if let Some(coords) = cache.lookup(&text.address) {
        debug!(name = %text.name, "cache hit");
        return CenterEntry::Resolved(center_from(entry, text, coords));
    }

    let query = build_query(&text.name, &text.address);
    match geocoder.geocode(&query).await {
        Ok(coords) => CenterEntry::Resolved(center_from(entry, text, coords)),
        Err(e) => {
            warn!(name = %text.name, error = %e, "geocode failed");
            unresolved(text, e.to_string())
        }
    }
}
