// src/specs/testing_sites.rs
//
// Testing-sites page. Two layouts are known:
//
//   sectioned: <h3 class="m-b-20" id="bronx-mortar">Bronx - Mortar Sites: PCR</h3>
//              <p>Name\nStreet\nCity\n...</p> <p>...</p> <h3 ...> ...
//   flat:      <p class="m-b-20">Name\nStreet\nCity\n...</p> ...
//
// Flat is only used when the page has no section headers at all.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::config::consts::{FLAT_ENTRY_SELECTOR, HEADER_SELECTOR};
use crate::core::html::{element_text, section_siblings, selector, ParagraphRun, SectionBoundary};
use crate::core::sanitize::capitalize_words;
use crate::data::RawEntry;
use crate::error::Result;

/// Metadata a section header contributes to every entry under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionTag {
    pub borough: String,
    pub site_type: String,
    pub test_type: String,
}

impl SectionTag {
    /// `id` like `staten-island-mortar`, `text` like `Staten Island - Mortar Sites: PCR`.
    pub fn from_header(id: &str, text: &str) -> Self {
        let (borough_slug, site_type) = match id.rsplit_once('-') {
            Some((head, tail)) => (head, tail),
            None => (id, ""),
        };
        let test_type = if text.contains(':') {
            text.rsplit(": ").next().unwrap_or("").trim().to_string()
        } else {
            String::new()
        };
        Self {
            borough: capitalize_words(borough_slug),
            site_type: site_type.to_string(),
            test_type,
        }
    }

    fn entry(&self, raw: String) -> RawEntry {
        RawEntry {
            borough: Some(self.borough.clone()),
            site_type: Some(self.site_type.clone()),
            test_type: Some(self.test_type.clone()),
            raw,
        }
    }
}

pub fn parse(html: &str) -> Result<Vec<RawEntry>> {
    parse_with(html, &ParagraphRun)
}

/// Parse with a custom section boundary.
pub fn parse_with(html: &str, boundary: &dyn SectionBoundary) -> Result<Vec<RawEntry>> {
    let doc = Html::parse_document(html);
    let header_sel = selector(HEADER_SELECTOR)?;
    let headers: Vec<ElementRef<'_>> = doc.select(&header_sel).collect();

    if headers.is_empty() {
        debug!("no section headers; falling back to flat entries");
        let flat_sel = selector(FLAT_ENTRY_SELECTOR)?;
        return Ok(doc
            .select(&flat_sel)
            .map(|el| RawEntry::untagged(element_text(el)))
            .collect());
    }

    let mut out = Vec::new();
    for header in headers {
        let Some(id) = header.value().attr("id") else {
            warn!(text = %element_text(header).trim(), "section header has no id; skipping");
            continue;
        };
        let tag = SectionTag::from_header(id, &element_text(header));
        let before = out.len();
        for p in section_siblings(header, boundary) {
            out.push(tag.entry(element_text(p)));
        }
        debug!(id, borough = %tag.borough, entries = out.len() - before, "section");
    }
    Ok(out)
}
