use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::db::timetable_repo;
use crate::error::AppError;
use crate::models::{
    BatchId, EntryId, EntryView, RegenerateResponse, Timetable, TimetableDetail, TimetableEntry,
    TimetableId, TimetableSummary, UpdateEntryRequest,
};
use crate::scheduling::{
    AssignmentEngine, CatalogSource, Mutator, Placement, RunContext, SchedulePolicy, Slot,
};
use crate::services::retry::{retry_once, with_timeout};
use crate::state::AppState;

/// Generates, reads, deletes and edits persisted timetables.
///
/// Every write runs under the shared writer lock and commits in a single
/// transaction, so a failed or abandoned operation leaves nothing behind.
pub struct TimetableService {
    db: SqlitePool,
    catalog: Arc<dyn CatalogSource>,
    policy: SchedulePolicy,
    writer: Arc<Mutex<()>>,
    op_timeout: Duration,
}

impl TimetableService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            catalog: state.catalog.clone(),
            policy: state.policy,
            writer: state.writer.clone(),
            op_timeout: state.op_timeout,
        }
    }

    pub async fn list(&self) -> Result<Vec<TimetableSummary>, AppError> {
        let timetables = retry_once("list timetables", move || {
            with_timeout(self.op_timeout, async move {
                Ok(timetable_repo::fetch_timetables(&self.db).await?)
            })
        })
        .await?;
        Ok(timetables.into_iter().map(TimetableSummary::from).collect())
    }

    pub async fn get(&self, id: TimetableId) -> Result<TimetableDetail, AppError> {
        retry_once("get timetable", move || {
            with_timeout(self.op_timeout, self.get_once(id))
        })
        .await
    }

    /// Builds and stores a fresh timetable for `batch_id`, replacing any
    /// earlier version of it.
    pub async fn generate(&self, batch_id: BatchId) -> Result<Timetable, AppError> {
        let _guard = self.lock_writer().await?;
        retry_once("generate timetable", move || {
            with_timeout(self.op_timeout, self.generate_once(batch_id))
        })
        .await
    }

    pub async fn regenerate(&self, batch_id: BatchId) -> Result<RegenerateResponse, AppError> {
        let timetable = self.generate(batch_id).await?;
        Ok(RegenerateResponse {
            message: "Timetable regenerated successfully".to_string(),
            timetable,
        })
    }

    /// Generates every batch in id order within one run. Either all
    /// timetables are stored or none are.
    pub async fn generate_all(&self) -> Result<Vec<Timetable>, AppError> {
        let _guard = self.lock_writer().await?;
        retry_once("generate all timetables", move || {
            with_timeout(self.op_timeout, self.generate_all_once())
        })
        .await
    }

    pub async fn delete(&self, id: TimetableId) -> Result<(), AppError> {
        let _guard = self.lock_writer().await?;
        retry_once("delete timetable", move || {
            with_timeout(self.op_timeout, self.delete_once(id))
        })
        .await
    }

    /// Moves one entry to another slot, switching rooms when its own room
    /// is taken there.
    pub async fn update_entry(
        &self,
        entry_id: EntryId,
        req: UpdateEntryRequest,
    ) -> Result<EntryView, AppError> {
        let _guard = self.lock_writer().await?;
        retry_once("update entry", move || {
            with_timeout(self.op_timeout, self.update_entry_once(entry_id, req.clone()))
        })
        .await
    }

    async fn lock_writer(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        tokio::time::timeout(self.op_timeout, self.writer.lock())
            .await
            .map_err(|_| {
                warn!("gave up waiting {:?} for the writer lock", self.op_timeout);
                AppError::Timeout(self.op_timeout.as_millis())
            })
    }

    async fn get_once(&self, id: TimetableId) -> Result<TimetableDetail, AppError> {
        let timetable = timetable_repo::find_timetable(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Timetable {id}")))?;
        let entries = timetable_repo::fetch_entries(&self.db, id).await?;
        let catalog = self.catalog.snapshot().await?;

        Ok(TimetableDetail {
            id: timetable.id,
            batch_id: timetable.batch_id,
            version: timetable.version,
            created_at: timetable.created_at,
            entries: entries.iter().map(|e| catalog.view(e)).collect(),
        })
    }

    async fn generate_once(&self, batch_id: BatchId) -> Result<Timetable, AppError> {
        let catalog = self.catalog.snapshot().await?;
        let committed = timetable_repo::fetch_entries_excluding_batch(&self.db, batch_id).await?;
        let mut ctx = RunContext::seeded(&committed);
        info!(
            "generating batch {} (run {}) around {} committed entries",
            batch_id,
            ctx.run_id(),
            committed.len()
        );

        let placements = AssignmentEngine::new(&catalog, self.policy)
            .assign_batch(batch_id, &mut ctx)
            .inspect_err(|e| warn!("generation for batch {} rejected: {}", batch_id, e))?;

        let mut tx = self.db.begin().await?;
        let timetable = store(&mut tx, batch_id, ctx.run_id(), &placements).await?;
        tx.commit().await?;

        info!(
            "generated timetable {} (version {}) for batch {} with {} entries",
            timetable.id,
            timetable.version,
            batch_id,
            placements.len()
        );
        Ok(timetable)
    }

    async fn generate_all_once(&self) -> Result<Vec<Timetable>, AppError> {
        let catalog = self.catalog.snapshot().await?;
        let engine = AssignmentEngine::new(&catalog, self.policy);
        let mut ctx = RunContext::new();
        info!("generating {} batches in run {}", catalog.batches.len(), ctx.run_id());

        let mut plans = Vec::with_capacity(catalog.batches.len());
        for &batch_id in catalog.batches.keys() {
            let placements = engine
                .assign_batch(batch_id, &mut ctx)
                .inspect_err(|e| warn!("generation for batch {} rejected: {}", batch_id, e))?;
            plans.push((batch_id, placements));
        }

        // Old entries of later batches would collide with the new run on the
        // teacher/room slot indexes, so every batch is cleared first.
        let mut tx = self.db.begin().await?;
        let mut versions = Vec::with_capacity(plans.len());
        for (batch_id, _) in &plans {
            versions.push(timetable_repo::delete_timetables_for_batch(&mut tx, *batch_id).await?);
        }
        let mut timetables = Vec::with_capacity(plans.len());
        for ((batch_id, placements), prior_version) in plans.iter().zip(versions) {
            let timetable =
                timetable_repo::insert_timetable(&mut tx, *batch_id, prior_version + 1, ctx.run_id())
                    .await?;
            timetable_repo::insert_entries(&mut tx, timetable.id, placements).await?;
            timetables.push(timetable);
        }
        tx.commit().await?;

        info!("generated {} timetables in run {}", timetables.len(), ctx.run_id());
        Ok(timetables)
    }

    async fn delete_once(&self, id: TimetableId) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        if !timetable_repo::delete_timetable(&mut tx, id).await? {
            return Err(AppError::NotFound(format!("Timetable {id}")));
        }
        tx.commit().await?;
        info!("deleted timetable {}", id);
        Ok(())
    }

    async fn update_entry_once(
        &self,
        entry_id: EntryId,
        req: UpdateEntryRequest,
    ) -> Result<EntryView, AppError> {
        let entry = timetable_repo::find_entry(&self.db, entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id}")))?;
        let target = Slot::new(
            req.day_of_week.unwrap_or(entry.day_of_week),
            req.period_number.unwrap_or(entry.period_number),
        )?;

        let catalog = self.catalog.snapshot().await?;
        let committed = timetable_repo::fetch_all_entries(&self.db).await?;
        let outcome = Mutator::new(&catalog, self.policy).plan_move(&entry, &committed, target)?;
        if outcome.unchanged {
            return Ok(catalog.view(&entry));
        }

        let mut tx = self.db.begin().await?;
        if !timetable_repo::move_entry(&mut tx, &entry, &outcome).await? {
            return Err(AppError::Conflict(format!(
                "Entry {entry_id} was changed by another request"
            )));
        }
        tx.commit().await?;

        if outcome.room_changed {
            info!(
                "moved entry {} from {} to {}, room {} -> {}",
                entry_id,
                entry.slot(),
                outcome.slot,
                entry.room_id,
                outcome.room_id
            );
        } else {
            info!("moved entry {} from {} to {}", entry_id, entry.slot(), outcome.slot);
        }

        let moved = TimetableEntry {
            day_of_week: outcome.slot.day,
            period_number: i64::from(outcome.slot.period),
            room_id: outcome.room_id,
            ..entry
        };
        Ok(catalog.view(&moved))
    }
}

/// Replaces the batch's stored timetable with `placements`, bumping the
/// version past the one it replaces.
async fn store(
    conn: &mut sqlx::SqliteConnection,
    batch_id: BatchId,
    run_id: uuid::Uuid,
    placements: &[Placement],
) -> Result<Timetable, AppError> {
    let prior_version = timetable_repo::delete_timetables_for_batch(conn, batch_id).await?;
    let timetable = timetable_repo::insert_timetable(conn, batch_id, prior_version + 1, run_id).await?;
    timetable_repo::insert_entries(conn, timetable.id, placements).await?;
    Ok(timetable)
}
