use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{BatchId, EntryId, Timetable, TimetableEntry, TimetableId};
use crate::scheduling::{MoveOutcome, Placement};

const TIMETABLE_COLUMNS: &str = "id, batch_id, version, run_id, status, created_at";
const ENTRY_COLUMNS: &str = "id, timetable_id, batch_id, offering_id, subject_id, teacher_id, \
     room_id, day_of_week, period_number, lab_part";

pub async fn fetch_timetables(db: &SqlitePool) -> Result<Vec<Timetable>, sqlx::Error> {
    let sql = format!("SELECT {TIMETABLE_COLUMNS} FROM timetables ORDER BY created_at, id");
    sqlx::query_as::<_, Timetable>(&sql).fetch_all(db).await
}

pub async fn find_timetable(
    db: &SqlitePool,
    id: TimetableId,
) -> Result<Option<Timetable>, sqlx::Error> {
    let sql = format!("SELECT {TIMETABLE_COLUMNS} FROM timetables WHERE id = ?");
    sqlx::query_as::<_, Timetable>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Entries of one timetable in grid order (Mon→Fri, period 1→8).
pub async fn fetch_entries(
    db: &SqlitePool,
    timetable_id: TimetableId,
) -> Result<Vec<TimetableEntry>, sqlx::Error> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE timetable_id = ?");
    let mut entries = sqlx::query_as::<_, TimetableEntry>(&sql)
        .bind(timetable_id)
        .fetch_all(db)
        .await?;
    entries.sort_by_key(|e| e.slot());
    Ok(entries)
}

pub async fn fetch_all_entries(db: &SqlitePool) -> Result<Vec<TimetableEntry>, sqlx::Error> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM timetable_entries ORDER BY id");
    sqlx::query_as::<_, TimetableEntry>(&sql).fetch_all(db).await
}

/// Committed entries of every batch except `batch_id`: the occupancy a
/// regeneration of that batch has to work around.
pub async fn fetch_entries_excluding_batch(
    db: &SqlitePool,
    batch_id: BatchId,
) -> Result<Vec<TimetableEntry>, sqlx::Error> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE batch_id != ? ORDER BY id");
    sqlx::query_as::<_, TimetableEntry>(&sql)
        .bind(batch_id)
        .fetch_all(db)
        .await
}

pub async fn find_entry(
    db: &SqlitePool,
    id: EntryId,
) -> Result<Option<TimetableEntry>, sqlx::Error> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE id = ?");
    sqlx::query_as::<_, TimetableEntry>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Removes every timetable of `batch_id` and returns the highest version
/// that existed (0 when there was none).
pub async fn delete_timetables_for_batch(
    conn: &mut SqliteConnection,
    batch_id: BatchId,
) -> Result<i64, sqlx::Error> {
    let prior: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM timetables WHERE batch_id = ?")
        .bind(batch_id)
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query(
        "DELETE FROM timetable_entries WHERE timetable_id IN (SELECT id FROM timetables WHERE batch_id = ?)",
    )
    .bind(batch_id)
    .execute(&mut *conn)
    .await?;
    sqlx::query("DELETE FROM timetables WHERE batch_id = ?")
        .bind(batch_id)
        .execute(&mut *conn)
        .await?;

    Ok(prior.unwrap_or(0))
}

pub async fn insert_timetable(
    conn: &mut SqliteConnection,
    batch_id: BatchId,
    version: i64,
    run_id: Uuid,
) -> Result<Timetable, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let run_id = run_id.to_string();
    let status = "generated".to_string();

    let id = sqlx::query(
        r#"
        INSERT INTO timetables (batch_id, version, run_id, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(batch_id)
    .bind(version)
    .bind(&run_id)
    .bind(&status)
    .bind(&now)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(Timetable {
        id,
        batch_id,
        version,
        run_id,
        status,
        created_at: now,
    })
}

pub async fn insert_entries(
    conn: &mut SqliteConnection,
    timetable_id: TimetableId,
    placements: &[Placement],
) -> Result<(), sqlx::Error> {
    for p in placements {
        sqlx::query(
            r#"
            INSERT INTO timetable_entries
                (timetable_id, batch_id, offering_id, subject_id, teacher_id, room_id,
                day_of_week, period_number, lab_part)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(timetable_id)
        .bind(p.batch_id)
        .bind(p.offering_id)
        .bind(p.subject_id)
        .bind(p.teacher_id)
        .bind(p.room_id)
        .bind(p.slot.day.as_str())
        .bind(i64::from(p.slot.period))
        .bind(p.lab_part.map(i64::from))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn delete_timetable(
    conn: &mut SqliteConnection,
    id: TimetableId,
) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM timetable_entries WHERE timetable_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM timetables WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}

/// Compare-and-swap relocation: only applies while the entry still sits
/// where `entry` says it does. Returns `false` when it has moved since.
pub async fn move_entry(
    conn: &mut SqliteConnection,
    entry: &TimetableEntry,
    outcome: &MoveOutcome,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE timetable_entries
        SET day_of_week = ?1,
            period_number = ?2,
            room_id = ?3
        WHERE id = ?4
          AND day_of_week = ?5
          AND period_number = ?6
          AND room_id = ?7
        "#,
    )
    .bind(outcome.slot.day.as_str())
    .bind(i64::from(outcome.slot.period))
    .bind(outcome.room_id)
    .bind(entry.id)
    .bind(entry.day_of_week.as_str())
    .bind(entry.period_number)
    .bind(entry.room_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(result > 0)
}
