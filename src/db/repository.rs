use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::models::{
    Batch, NewBatchRequest, NewOfferingRequest, NewRoomRequest, NewSubjectRequest,
    NewTeacherRequest, Room, Subject, SubjectOffering, Teacher,
};

/// A catalog table readable through the generic `list`/`get`/`delete`.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
}

impl Record for Teacher {
    const TABLE: &'static str = "teachers";
    const COLUMNS: &'static str =
        "id, name, email, department, max_sessions_per_day, max_sessions_per_week";
}

impl Record for Batch {
    const TABLE: &'static str = "batches";
    const COLUMNS: &'static str = "id, name, department, semester, academic_year";
}

impl Record for Subject {
    const TABLE: &'static str = "subjects";
    const COLUMNS: &'static str = "id, name, teacher_id, sessions_per_week, is_lab, lab_duration";
}

impl Record for SubjectOffering {
    const TABLE: &'static str = "subject_offerings";
    const COLUMNS: &'static str =
        "id, subject_id, teacher_id, batch_id, sessions_per_week, max_sessions_per_day";
}

impl Record for Room {
    const TABLE: &'static str = "rooms";
    const COLUMNS: &'static str = "id, name, capacity, room_type, assigned_batch_id";
}

pub async fn list<T: Record>(db: &SqlitePool) -> Result<Vec<T>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} ORDER BY id", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T>(&sql).fetch_all(db).await
}

pub async fn get<T: Record>(db: &SqlitePool, id: i64) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(db).await
}

pub async fn delete<T: Record>(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(db).await?.rows_affected();
    Ok(result > 0)
}

pub async fn insert_teacher(db: &SqlitePool, req: NewTeacherRequest) -> Result<Teacher, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO teachers
            (name, email, department, max_sessions_per_day, max_sessions_per_week)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.department)
    .bind(req.max_sessions_per_day)
    .bind(req.max_sessions_per_week)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Teacher {
        id,
        name: req.name,
        email: req.email,
        department: req.department,
        max_sessions_per_day: req.max_sessions_per_day,
        max_sessions_per_week: req.max_sessions_per_week,
    })
}

pub async fn insert_batch(db: &SqlitePool, req: NewBatchRequest) -> Result<Batch, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO batches (name, department, semester, academic_year)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&req.name)
    .bind(&req.department)
    .bind(&req.semester)
    .bind(&req.academic_year)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Batch {
        id,
        name: req.name,
        department: req.department,
        semester: req.semester,
        academic_year: req.academic_year,
    })
}

pub async fn insert_subject(db: &SqlitePool, req: NewSubjectRequest) -> Result<Subject, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO subjects (name, teacher_id, sessions_per_week, is_lab, lab_duration)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&req.name)
    .bind(req.teacher_id)
    .bind(req.sessions_per_week)
    .bind(req.is_lab)
    .bind(req.lab_duration)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Subject {
        id,
        name: req.name,
        teacher_id: req.teacher_id,
        sessions_per_week: req.sessions_per_week,
        is_lab: req.is_lab,
        lab_duration: req.lab_duration,
    })
}

pub async fn insert_offering(
    db: &SqlitePool,
    req: NewOfferingRequest,
) -> Result<SubjectOffering, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO subject_offerings
            (subject_id, teacher_id, batch_id, sessions_per_week, max_sessions_per_day)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(req.subject_id)
    .bind(req.teacher_id)
    .bind(req.batch_id)
    .bind(req.sessions_per_week)
    .bind(req.max_sessions_per_day)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(SubjectOffering {
        id,
        subject_id: req.subject_id,
        teacher_id: req.teacher_id,
        batch_id: req.batch_id,
        sessions_per_week: req.sessions_per_week,
        max_sessions_per_day: req.max_sessions_per_day,
    })
}

pub async fn insert_room(db: &SqlitePool, req: NewRoomRequest) -> Result<Room, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO rooms (name, capacity, room_type, assigned_batch_id)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&req.name)
    .bind(req.capacity)
    .bind(req.room_type.as_str())
    .bind(req.assigned_batch_id)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Room {
        id,
        name: req.name,
        capacity: req.capacity,
        room_type: req.room_type,
        assigned_batch_id: req.assigned_batch_id,
    })
}
