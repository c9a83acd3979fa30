#![allow(clippy::unwrap_used)]
// Retry/backoff properties of the request pipeline, measured on tokio's
// paused clock so the exponential delays are observed exactly, without
// slowing the suite down.
//
// Transport failures are produced with real sockets: a listener that drops
// the first N connections (dropped connection), or a freed port (connection
// refused).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use accessly_api::{ApiClient, Error, TokenCredentials};

fn client_for(port: u16, max_retries: u32, retry_delay: Duration) -> ApiClient {
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}/api/v1/developer")).unwrap();
    ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        TokenCredentials::new(SecretString::from("tok".to_string()), None),
        max_retries,
        retry_delay,
    )
}

/// Accept connections forever; drop the first `failures` outright, then
/// answer every later request with a fixed JSON 200.
async fn flaky_server(listener: TcpListener, failures: usize, connections: Arc<AtomicUsize>) {
    loop {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let seen = connections.fetch_add(1, Ordering::SeqCst) + 1;

        if seen <= failures {
            drop(stream);
            continue;
        }

        let mut buf = [0_u8; 4096];
        let _ = stream.read(&mut buf).await;
        let body = r#"{"data":[]}"#;
        let resp = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(resp.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_per_attempt_until_success() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let connections = Arc::new(AtomicUsize::new(0));
    tokio::spawn(flaky_server(listener, 3, Arc::clone(&connections)));

    // max_retries = 3: attempts 0-2 fail at the transport level, attempt 3
    // succeeds. Sleeps: 1s + 2s + 4s = 7s of virtual time.
    let client = client_for(port, 3, Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    let payload = client.get("/users").await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(payload.get("data"), Some(&Value::Array(vec![])));
    assert_eq!(connections.load(Ordering::SeqCst), 4);
    assert!(
        elapsed >= Duration::from_secs(7),
        "expected >= 7s of backoff, observed {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(8),
        "expected < 8s of backoff, observed {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_surfaces_one_connection_error() {
    // Bind then free a port so every connect is refused.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    // max_retries = 2: exactly 3 attempts (0, 1, 2), sleeps 1s + 2s.
    let client = client_for(port, 2, Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    let err = client.get("/users").await.unwrap_err();
    let elapsed = start.elapsed();

    match err {
        Error::Connection { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(
                message.contains("after 3 attempts"),
                "message should carry the attempt count: {message}"
            );
        }
        other => panic!("expected Connection error, got: {other:?}"),
    }

    assert!(
        elapsed >= Duration::from_secs(3),
        "expected >= 3s of backoff, observed {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(4),
        "expected < 4s of backoff, observed {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_a_single_attempt() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = client_for(port, 0, Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    let err = client.get("/users").await.unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, Error::Connection { attempts: 1, .. }));
    assert!(
        elapsed < Duration::from_secs(1),
        "no backoff expected, observed {elapsed:?}"
    );
}
