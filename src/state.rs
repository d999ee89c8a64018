use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::scheduling::{CatalogSource, SchedulePolicy};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub catalog: Arc<dyn CatalogSource>,
    pub policy: SchedulePolicy,
    pub op_timeout: Duration,
    /// Single-writer gate: every operation that writes timetable entries
    /// holds it until its transaction commits.
    pub writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        catalog: Arc<dyn CatalogSource>,
        policy: SchedulePolicy,
        op_timeout: Duration,
    ) -> Self {
        Self {
            db,
            catalog,
            policy,
            op_timeout,
            writer: Arc::new(Mutex::new(())),
        }
    }
}
