// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::consts::*;

/// Everything one collector run needs.
#[derive(Debug)]
pub struct CollectOptions {
    pub page_url: String,
    /// Snapshot path: read for the coordinate cache, then overwritten.
    pub data_file: PathBuf,
    pub geocoder: GeocoderOptions,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            page_url: PAGE_URL.to_string(),
            data_file: PathBuf::from(DATA_FILE),
            geocoder: GeocoderOptions::default(),
        }
    }
}

#[derive(Debug)]
pub struct GeocoderOptions {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    /// Minimum gap between two geocoding requests.
    pub pause: Duration,
    pub timeout: Duration,
}

impl Default for GeocoderOptions {
    fn default() -> Self {
        Self {
            endpoint: GEOCODE_ENDPOINT.to_string(),
            api_key: None,
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        }
    }
}

impl GeocoderOptions {
    /// Empty strings count as "not configured".
    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::from);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentOptions {
    pub data_file: PathBuf,
    pub wait_times: Option<PathBuf>,
    pub out: PathBuf,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            wait_times: None,
            out: PathBuf::from(DATA_FILE).with_extension("geojson"),
        }
    }
}
