// src/geocode.rs
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::config::GeocoderOptions;
use crate::core::net;
use crate::data::Coordinates;
use crate::error::{Error, Result};

/// Turns an encoded address query into coordinates.
///
/// `query` is already percent-encoded (see [`build_query`]).
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Coordinates>;
}

/// `name+line1+line2` with spaces turned into `+`, then percent-encoded.
pub fn build_query(name: &str, address: &[String]) -> String {
    let mut joined = String::from(name);
    for line in address {
        joined.push('+');
        joined.push_str(line);
    }
    urlencoding::encode(&joined.replace(' ', "+")).into_owned()
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

/// First result's location, or `NoResults` carrying the raw body.
pub fn parse_response(body: &str) -> Result<Coordinates> {
    let resp: GeocodeResponse = serde_json::from_str(body).map_err(Error::Decode)?;
    match resp.results.into_iter().next() {
        Some(first) => Ok(first.geometry.location),
        None => {
            error!(status = %resp.status, response = %body, "geocoder returned no results");
            Err(Error::NoResults { status: resp.status, body: body.to_string() })
        }
    }
}

/// Google Geocoding JSON API, one request at a time with a minimum gap.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    pause: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, opts: &GeocoderOptions) -> Result<Self> {
        let key = opts.api_key.as_ref().ok_or(Error::MissingApiKey)?;
        Ok(Self {
            client,
            endpoint: opts.endpoint.clone(),
            api_key: SecretString::from(key.expose_secret().to_string()),
            pause: opts.pause,
            last_request: Mutex::new(None),
        })
    }

    fn url(&self, query: &str) -> String {
        format!(
            "{}?address={}&key={}",
            self.endpoint,
            query,
            urlencoding::encode(self.api_key.expose_secret())
        )
    }

    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let since = prev.elapsed();
            if since < self.pause {
                tokio::time::sleep(self.pause - since).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinates> {
        self.wait_turn().await;
        debug!(query, "geocoding");
        let body = net::http_get(&self.client, &self.url(query)).await?;
        parse_response(&body)
    }
}
