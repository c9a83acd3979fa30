//! Error handling patterns: matching on the closed error taxonomy instead
//! of string-sniffing messages.

use secrecy::SecretString;

use accessly_core::{AccessDirectory, ClientConfig, CoreError};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let host = std::env::var("ACCESSLY_HOST").unwrap_or_else(|_| "192.0.2.1".into());
    let token = std::env::var("ACCESSLY_TOKEN").unwrap_or_default();

    // An empty token fails locally, before any network attempt.
    let directory = match AccessDirectory::new(ClientConfig::new(host, SecretString::from(token))) {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("client construction failed: {e}");
            return;
        }
    };

    match directory.users(10, 0).await {
        Ok(users) => println!("fetched {} user(s)", users.len()),
        Err(CoreError::AuthenticationFailed { message }) => {
            eprintln!("authentication problem: {message}");
            eprintln!("hint: generate a token under Access > Settings > Advanced > API Token");
        }
        Err(CoreError::ConnectionFailed { message }) => {
            // The retry budget is already spent by the time this surfaces.
            eprintln!("controller unreachable: {message}");
        }
        Err(CoreError::RateLimited { message }) => {
            eprintln!("rate limited, back off and try again: {message}");
        }
        Err(CoreError::Timeout { timeout_secs }) => {
            eprintln!("request timed out after {timeout_secs}s");
        }
        Err(other) => eprintln!("request failed: {other}"),
    }

    match directory.user("missing-user-id").await {
        Err(CoreError::NotFound { message }) => println!("as expected, not found: {message}"),
        Ok(user) => println!("surprisingly, found {}", user.full_name()),
        Err(other) => eprintln!("lookup failed differently: {other}"),
    }

    // Some surfaces simply do not exist in the developer API; those fail
    // locally and deterministically.
    if let Err(e) = directory.unlock_door("front-door", 10) {
        println!("local failure without a round trip: {e}");
    }
}
