#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use timetable_backend::db::{MIGRATOR, SqliteCatalog, repository};
use timetable_backend::models::*;
use timetable_backend::scheduling::SchedulePolicy;
use timetable_backend::services::TimetableService;
use timetable_backend::state::AppState;

/// A single connection keeps every query on the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn state_with(pool: SqlitePool, policy: SchedulePolicy) -> AppState {
    let catalog = Arc::new(SqliteCatalog::new(pool.clone()));
    AppState::new(pool, catalog, policy, Duration::from_secs(5))
}

pub async fn setup_state() -> AppState {
    state_with(setup_pool().await, SchedulePolicy::default())
}

pub fn service(state: &AppState) -> TimetableService {
    TimetableService::new(state)
}

pub async fn teacher(db: &SqlitePool, name: &str, per_day: i64, per_week: i64) -> i64 {
    repository::insert_teacher(
        db,
        NewTeacherRequest {
            name: name.to_string(),
            email: format!("{}@example.edu", name.to_lowercase()),
            department: None,
            max_sessions_per_day: per_day,
            max_sessions_per_week: per_week,
        },
    )
    .await
    .expect("Failed to insert teacher")
    .id
}

pub async fn batch(db: &SqlitePool, name: &str) -> i64 {
    repository::insert_batch(
        db,
        NewBatchRequest {
            name: name.to_string(),
            department: None,
            semester: None,
            academic_year: None,
        },
    )
    .await
    .expect("Failed to insert batch")
    .id
}

pub async fn subject(db: &SqlitePool, name: &str, is_lab: bool) -> i64 {
    repository::insert_subject(
        db,
        NewSubjectRequest {
            name: name.to_string(),
            teacher_id: None,
            sessions_per_week: 5,
            is_lab,
            lab_duration: None,
        },
    )
    .await
    .expect("Failed to insert subject")
    .id
}

pub async fn offering(
    db: &SqlitePool,
    subject_id: i64,
    teacher_id: i64,
    batch_id: i64,
    sessions_per_week: i64,
    max_sessions_per_day: i64,
) -> i64 {
    repository::insert_offering(
        db,
        NewOfferingRequest {
            subject_id,
            teacher_id,
            batch_id,
            sessions_per_week,
            max_sessions_per_day,
        },
    )
    .await
    .expect("Failed to insert offering")
    .id
}

pub async fn room(db: &SqlitePool, name: &str, room_type: RoomType) -> i64 {
    repository::insert_room(
        db,
        NewRoomRequest {
            name: name.to_string(),
            capacity: Some(60),
            room_type,
            assigned_batch_id: None,
        },
    )
    .await
    .expect("Failed to insert room")
    .id
}
