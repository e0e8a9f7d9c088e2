// tests/collect_local.rs
//
// Full `collect` run against a throwaway HTTP/1.0 server on 127.0.0.1 that
// serves the fixture page and a canned geocoder.
//
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use testsites_scrape::config::{CollectOptions, GeocoderOptions};
use testsites_scrape::data::CenterEntry;
use testsites_scrape::progress::NullProgress;
use testsites_scrape::{scrape, store, Error};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const FIXTURE: &str = include_str!("fixtures/testing_sites.html");

struct Server {
    addr: SocketAddr,
    geocode_hits: Arc<AtomicUsize>,
}

fn route(path: &str, failing: &[&str]) -> (&'static str, String) {
    if path == "/sites" {
        return ("200 OK", FIXTURE.to_string());
    }
    if let Some(query) = path.strip_prefix("/geocode?address=") {
        if failing.iter().any(|f| query.starts_with(f)) {
            return ("500 Internal Server Error", "upstream down".to_string());
        }
        let body = if query.starts_with("Nowhere") {
            r#"{"status":"ZERO_RESULTS","results":[]}"#.to_string()
        } else {
            r#"{"status":"OK","results":[{"geometry":{"location":{"lat":40.7,"lng":-74.0}}}]}"#.to_string()
        };
        return ("200 OK", body);
    }
    ("404 Not Found", "not here".to_string())
}

async fn serve() -> Server {
    serve_failing(&[]).await
}

/// Geocode queries starting with any of `failing` get a 500.
async fn serve_failing(failing: &'static [&'static str]) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let geocode_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&geocode_hits);

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else { break };
            let hits = Arc::clone(&hits);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match sock.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let req = String::from_utf8_lossy(&buf);
                let path = req.split_whitespace().nth(1).unwrap_or("/").to_string();
                if path.starts_with("/geocode") {
                    hits.fetch_add(1, Ordering::SeqCst);
                }
                let (status, body) = route(&path, failing);
                let resp = format!(
                    "HTTP/1.0 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    Server { addr, geocode_hits }
}

fn options(server: &Server, page: &str, data: std::path::PathBuf) -> CollectOptions {
    let mut geocoder = GeocoderOptions {
        endpoint: format!("http://{}/geocode", server.addr),
        pause: Duration::from_millis(0),
        timeout: Duration::from_secs(5),
        ..GeocoderOptions::default()
    };
    geocoder.set_api_key(Some("test-key".into()));
    CollectOptions {
        page_url: format!("http://{}{}", server.addr, page),
        data_file: data,
        geocoder,
    }
}

#[tokio::test]
async fn collect_writes_snapshot_then_reuses_it() {
    let server = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data").join("centers.json");
    let opts = options(&server, "/sites", data.clone());

    let first = scrape::collect(&opts, &mut NullProgress).await.unwrap();
    assert_eq!(first.total, 4);
    assert_eq!(first.resolved, 3);
    assert_eq!(server.geocode_hits.load(Ordering::SeqCst), 4);

    let snap = store::try_load_snapshot(&data).unwrap();
    assert!(matches!(&snap.centers[3], CenterEntry::Unresolved(u) if u.name == "Nowhere Van"));

    let second = scrape::collect(&opts, &mut NullProgress).await.unwrap();
    assert_eq!(second, first);
    // Only the unresolved address goes back to the geocoder.
    assert_eq!(server.geocode_hits.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn failed_page_fetch_writes_nothing() {
    let server = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("centers.json");
    std::fs::write(&data, r#"{"timestamp":"2021-01-01T00:00:00Z","centers":[]}"#).unwrap();
    let before = std::fs::read_to_string(&data).unwrap();

    let err = scrape::collect(&options(&server, "/missing", data.clone()), &mut NullProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { .. }));
    assert_eq!(std::fs::read_to_string(&data).unwrap(), before);
    assert_eq!(server.geocode_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn server_error_mid_run_keeps_going_and_keeps_the_key_out() {
    let server = serve_failing(&["Jacobi"]).await;
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("centers.json");

    let summary = scrape::collect(&options(&server, "/sites", data.clone()), &mut NullProgress)
        .await
        .unwrap();

    assert_eq!(server.geocode_hits.load(Ordering::SeqCst), 4);
    assert_eq!(summary.resolved, 2);
    let positions: Vec<usize> = summary.failed.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(positions, vec![1, 3]);
    assert!(summary.failed[0].2.contains("500"));

    let snap = store::try_load_snapshot(&data).unwrap();
    assert!(snap.centers[0].is_resolved());
    assert!(snap.centers[2].is_resolved());

    let text = std::fs::read_to_string(&data).unwrap();
    assert!(!text.contains("test-key"), "{text}");
    assert!(summary.failed.iter().all(|(_, _, reason)| !reason.contains("test-key")));
}

#[tokio::test]
async fn unreachable_geocoder_keeps_the_key_out() {
    let server = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("centers.json");
    let mut opts = options(&server, "/sites", data.clone());
    // Nothing listens on port 1.
    opts.geocoder.endpoint = "http://127.0.0.1:1/geocode".into();

    let summary = scrape::collect(&opts, &mut NullProgress).await.unwrap();

    assert_eq!(summary.resolved, 0);
    assert_eq!(summary.failed.len(), 4);
    let text = std::fs::read_to_string(&data).unwrap();
    assert!(text.contains("127.0.0.1:1/geocode"));
    assert!(!text.contains("test-key"), "{text}");
}
