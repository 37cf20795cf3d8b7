//! StudyCal sync agent
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use StudyCal::{
    calendar::{upcoming, EventFilter},
    config::Settings,
    database::{connection::create_pool, run_migrations, PgEventRepository},
    services::EventService,
    utils::{helpers::truncate_text, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting StudyCal sync agent...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = StudyCal::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: Duration::from_secs(30),
        idle_timeout: Some(Duration::from_secs(600)),
        max_lifetime: Some(Duration::from_secs(1800)),
    };
    let pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&pool).await?;

    // Bring the owner's events into the local snapshot
    let repository = Arc::new(PgEventRepository::new(pool));
    let events = EventService::new(repository, settings.calendar.owner.clone());
    let loaded = events.load().await?;
    info!(
        owner = %events.owner(),
        count = loaded.len(),
        "Event snapshot loaded"
    );

    print_upcoming_digest(&events).await;

    // Follow remote changes and refresh the snapshot as they arrive
    if settings.features.live_reload {
        let feed_events = events.clone();
        tokio::spawn(async move {
            if let Err(e) = follow_changes(feed_events).await {
                warn!(error = %e, "Change feed stopped");
            }
        });
        info!("Live reload enabled, following remote changes");
    }

    info!("StudyCal sync agent is ready!");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("StudyCal sync agent has been shut down.");

    Ok(())
}

/// Log the next events so a glance at the console shows what is due
async fn print_upcoming_digest(events: &EventService) {
    let snapshot = events.snapshot();
    let today = chrono::Local::now().date_naive();
    let digest = upcoming(&snapshot, today, &EventFilter::default());

    if digest.is_empty() {
        info!("No upcoming events");
        return;
    }

    for event in digest {
        info!(
            date = %event.date,
            kind = event.event_type.label(),
            "{}",
            truncate_text(&event.title, 48)
        );
    }
}

/// Reload the snapshot whenever the backend reports a change. Notices are
/// coalesced with a short pause so a burst of writes triggers one reload.
async fn follow_changes(events: EventService) -> StudyCal::Result<()> {
    let mut feed = events.subscribe().await?;

    while let Some(notice) = feed.recv().await {
        tokio::time::sleep(Duration::from_millis(100)).await;
        match events.load().await {
            Ok(rows) => {
                info!(owner = %notice.owner, count = rows.len(), "Snapshot refreshed from change feed");
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh snapshot after change");
            }
        }
    }

    Ok(())
}
