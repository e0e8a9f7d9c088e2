// src/core/net.rs
// HTTP GET over reqwest; one shared client per run.
//
// URLs may carry credentials in the query (`&key=`), so errors and log lines
// only ever see `redact(url)`.

use std::time::Duration;

use tracing::debug;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("could not build HTTP client: {e}")))
}

/// `url` without its query string or fragment.
pub fn redact(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}

/// GET `url` and return the body. Non-2xx is an error.
pub async fn http_get(client: &reqwest::Client, url: &str) -> Result<String> {
    let shown = redact(url);
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|source| Error::Http { url: shown.clone(), source: source.without_url() })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status { url: shown, status });
    }

    let body = resp
        .text()
        .await
        .map_err(|source| Error::Http { url: shown.clone(), source: source.without_url() })?;
    debug!(url = %shown, bytes = body.len(), "fetched");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_drops_query_and_fragment() {
        assert_eq!(
            redact("https://maps.example/geocode/json?address=A%2BB&key=secret"),
            "https://maps.example/geocode/json"
        );
        assert_eq!(redact("http://host/page#top"), "http://host/page");
        assert_eq!(redact("http://host/page"), "http://host/page");
    }

    #[tokio::test]
    async fn transport_error_text_has_no_query() {
        // Port 1 on loopback refuses connections.
        let err = http_get(&reqwest::Client::new(), "http://127.0.0.1:1/geocode?address=x&key=secret")
            .await
            .unwrap_err();
        let text = format!("{err} {:?}", err);
        assert!(matches!(err, Error::Http { .. }));
        assert!(!text.contains("secret"), "{text}");
    }
}
