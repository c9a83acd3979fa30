//! Basic usage: connect to a controller and list users, doors, and devices.
//!
//! ```sh
//! ACCESSLY_HOST=192.168.1.10 ACCESSLY_TOKEN=... cargo run --example basic_usage
//! ```

use secrecy::SecretString;

use accessly_core::{AccessDirectory, ClientConfig, CoreError};

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let host = std::env::var("ACCESSLY_HOST").map_err(|_| CoreError::Config {
        message: "set ACCESSLY_HOST to the controller address".into(),
    })?;
    let token = std::env::var("ACCESSLY_TOKEN").map_err(|_| CoreError::Config {
        message: "set ACCESSLY_TOKEN to an API token".into(),
    })?;

    let config = ClientConfig::new(host, SecretString::from(token));
    let directory = AccessDirectory::new(config)?;

    let users = directory.users(100, 0).await?;
    println!("{} user(s):", users.len());
    for user in &users {
        println!(
            "  {} <{}> [{}]",
            user.full_name(),
            user.email.as_deref().unwrap_or("-"),
            user.role.as_str()
        );
    }

    let doors = directory.doors(100, 0).await?;
    println!("\n{} door(s):", doors.len());
    for door in &doors {
        println!(
            "  {} - {} ({})",
            door.name,
            if door.is_locked { "locked" } else { "unlocked" },
            if door.is_online { "online" } else { "offline" },
        );
    }

    let devices = directory.devices(100, 0).await?;
    println!("\n{} device(s):", devices.len());
    for device in &devices {
        println!("  {} [{}]", device.name, device.device_type.as_str());
    }

    Ok(())
}
