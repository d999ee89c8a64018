use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable_backend::api::router;
use timetable_backend::config::AppConfig;
use timetable_backend::db::{self, SqliteCatalog};
use timetable_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "timetable_backend=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    info!(
        "lab blocks of {} period(s), lab room overflow {}, half-day separation {}",
        config.policy.lab_block_periods,
        config.policy.lab_room_overflow,
        config.policy.subject_half_day_separation
    );

    let pool = db::connect(&config).await?;
    let catalog = Arc::new(SqliteCatalog::new(pool.clone()));
    let state = AppState::new(pool, catalog, config.policy, config.op_timeout);

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
