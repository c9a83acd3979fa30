//! Visitor lifecycle: create a visitor with a one-day window, assign a PIN,
//! extend the visit, then clean up.

use chrono::{Duration, Utc};
use secrecy::SecretString;

use accessly_core::{
    AccessDirectory, ClientConfig, CoreError, CreateVisitorRequest, UpdateVisitorRequest,
};

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt().init();

    let host = std::env::var("ACCESSLY_HOST").map_err(|_| CoreError::Config {
        message: "set ACCESSLY_HOST to the controller address".into(),
    })?;
    let token = std::env::var("ACCESSLY_TOKEN").map_err(|_| CoreError::Config {
        message: "set ACCESSLY_TOKEN to an API token".into(),
    })?;

    let directory = AccessDirectory::new(ClientConfig::new(host, SecretString::from(token)))?;

    let now = Utc::now();
    let visitor = directory
        .create_visitor(&CreateVisitorRequest {
            first_name: "Jordan".into(),
            last_name: "Reyes".into(),
            start_date: now,
            end_date: now + Duration::hours(8),
            email: Some("jordan@example.com".into()),
            phone: None,
            access_policy_ids: Vec::new(),
            sponsor_user_id: None,
            notes: Some("contractor visit".into()),
        })
        .await?;
    println!("created visitor {} ({})", visitor.full_name(), visitor.id);

    if directory.set_visitor_pin(&visitor.id, "4921").await? {
        println!("PIN assigned");
    }

    // Extend the window to a full day.
    let updated = directory
        .update_visitor(
            &visitor.id,
            &UpdateVisitorRequest {
                end_date: Some(now + Duration::hours(24)),
                ..UpdateVisitorRequest::default()
            },
        )
        .await?;
    println!(
        "visit window now {} .. {}",
        updated.start_date, updated.end_date
    );

    let visitors = directory.visitors(100, 0).await?;
    println!("{} active visitor(s)", visitors.iter().filter(|v| v.is_valid()).count());

    directory.delete_visitor(&visitor.id).await?;
    println!("visitor removed");

    Ok(())
}
