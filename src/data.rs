// src/data.rs
//
// Records that flow through the collector:
//
// - RawEntry:    one unparsed site block as it came off the page, tagged with
//                the section header it sat under (if any).
// - Center:      a geocoded site, the unit the presenter renders.
// - CenterEntry: the outcome stored at each snapshot position.
// - Snapshot:    the persisted `{timestamp, centers}` file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One testing-site text block lifted from the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub borough: Option<String>,
    pub site_type: Option<String>,
    pub test_type: Option<String>,
    pub raw: String,
}

impl RawEntry {
    /// Entry from the flat fallback: no section metadata.
    pub fn untagged(raw: impl Into<String>) -> Self {
        Self { raw: raw.into(), ..Self::default() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    pub name: String,
    /// The two lines following the name line.
    pub address: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    /// Always set by this collector; optional only so hand-edited files still load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub context: Vec<String>,
}

/// A site that could not be placed on the map, kept with its reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unresolved {
    pub name: String,
    pub address: Vec<String>,
    pub reason: String,
}

/// Outcome stored at one snapshot position.
///
/// Variant order matters for deserialization: an `Unresolved` object is the
/// only shape with `reason`, and a bare `null` comes from older snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CenterEntry {
    Unresolved(Unresolved),
    Resolved(Center),
    Missing,
}

impl CenterEntry {
    pub fn center(&self) -> Option<&Center> {
        match self {
            CenterEntry::Resolved(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CenterEntry::Resolved(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub centers: Vec<CenterEntry>,
}

impl Snapshot {
    pub fn new(centers: Vec<CenterEntry>) -> Self {
        Self { timestamp: Utc::now(), centers }
    }

    /// No prior data; used when the previous file is missing or unreadable.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn resolved(&self) -> impl Iterator<Item = &Center> {
        self.centers.iter().filter_map(CenterEntry::center)
    }

    pub fn resolved_count(&self) -> usize {
        self.centers.iter().filter(|e| e.is_resolved()).count()
    }
}
