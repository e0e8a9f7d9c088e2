// src/present.rs
//
// Map-ready export of a snapshot: one GeoJSON point per resolved center with
// the popup HTML a map widget can attach as-is.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::config::consts::PRE_REGISTER_LINE;
use crate::config::PresentOptions;
use crate::core::sanitize::escape_html;
use crate::data::{Center, Snapshot};
use crate::error::{Error, Result};
use crate::store;

/// One record of the live wait-time feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTime {
    pub fullname: String,
    pub wait_time: String,
    pub last_reported: String,
}

pub fn type_icon(site_type: &str) -> &'static str {
    match site_type {
        "mortar" => "🏥",
        "mobile" => "🚑",
        "micro" => "⛺️",
        _ => "",
    }
}

fn heading(text: &str) -> String {
    format!(r#"<h3 class="text-md font-bold py-1">{}</h3>"#, escape_html(text))
}

fn para(text: &str) -> String {
    format!(r#"<p class="text-md">{}</p>"#, escape_html(text))
}

pub fn format_popup(center: &Center, wait: Option<&WaitTime>) -> String {
    let icon = type_icon(center.site_type.as_deref().unwrap_or(""));
    let mut html = String::from(r#"<div class="font-sans px-2">"#);
    html.push_str(&format!(
        r#"<h3 class="text-lg font-bold py-1">{} {}</h3>"#,
        icon,
        escape_html(&center.name)
    ));

    html.push_str(&heading("Location"));
    for line in &center.address {
        html.push_str(&para(line));
    }

    if let Some(tt) = center.test_type.as_deref().filter(|t| !t.is_empty()) {
        html.push_str(&heading("Testing Types"));
        html.push_str(&para(tt));
    }

    html.push_str(&heading("Details"));
    for line in center.context.iter().filter(|l| l.as_str() != PRE_REGISTER_LINE) {
        html.push_str(&para(line));
    }

    if let Some(w) = wait {
        html.push_str(&heading("Wait Times"));
        html.push_str(&format!("<p>Current wait time: {}</p>", escape_html(&w.wait_time)));
        html.push_str(&format!("<p>Wait time last reported: {}</p>", escape_html(&w.last_reported)));
    }

    html.push_str("</div>");
    html
}

/// GeoJSON FeatureCollection; wait times join on `name == fullname`.
pub fn feature_collection(snapshot: &Snapshot, waits: &[WaitTime]) -> Value {
    let by_name: HashMap<&str, &WaitTime> = waits.iter().map(|w| (w.fullname.as_str(), w)).collect();

    let features: Vec<Value> = snapshot
        .resolved()
        .filter_map(|center| {
            let coords = center.coordinates?;
            let wait = by_name.get(center.name.as_str()).copied();
            let site_type = center.site_type.as_deref().unwrap_or("");

            let mut props = json!({
                "name": center.name,
                "siteType": site_type,
                "icon": type_icon(site_type),
                "popup": format_popup(center, wait),
            });
            if let Some(w) = wait {
                props["waitTime"] = json!(w.wait_time);
                props["lastReported"] = json!(w.last_reported);
            }

            Some(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [coords.lng, coords.lat] },
                "properties": props,
            }))
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

pub fn load_wait_times(path: &Path) -> Result<Vec<WaitTime>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Snapshot (+ optional wait times) → GeoJSON file. Returns the feature count.
pub fn export(opts: &PresentOptions) -> Result<usize> {
    let snapshot = store::try_load_snapshot(&opts.data_file)?;
    let waits = match &opts.wait_times {
        Some(p) => load_wait_times(p)?,
        None => Vec::new(),
    };

    let fc = feature_collection(&snapshot, &waits);
    let count = fc["features"].as_array().map_or(0, Vec::len);

    if let Some(parent) = opts.out.parent() {
        if !parent.as_os_str().is_empty() {
            store::ensure_directory(parent)?;
        }
    }
    let text = serde_json::to_string_pretty(&fc).map_err(|e| Error::json(&opts.out, e))?;
    fs::write(&opts.out, text).map_err(|e| Error::io(&opts.out, e))?;

    info!(out = %opts.out.display(), features = count, waits = waits.len(), "wrote map data");
    Ok(count)
}
