use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::extract::{JsonBody, PathParams};
use crate::db::repository::{self, Record};
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

/// Catalog tables reachable under `/data/{entity}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Teachers,
    Batches,
    Subjects,
    Rooms,
    SubjectOfferings,
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teachers" => Ok(Self::Teachers),
            "batches" => Ok(Self::Batches),
            "subjects" => Ok(Self::Subjects),
            "rooms" => Ok(Self::Rooms),
            "subject_offerings" => Ok(Self::SubjectOfferings),
            other => Err(AppError::BadRequest(format!("unknown entity '{other}'"))),
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Json<Value>, AppError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|_| AppError::InternalServerError)
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn list_as<T: Record + Serialize>(state: &AppState) -> Result<Json<Value>, AppError> {
    to_json(repository::list::<T>(&state.db).await?)
}

async fn get_as<T: Record + Serialize>(
    state: &AppState,
    entity: &str,
    id: i64,
) -> Result<Json<Value>, AppError> {
    let record = repository::get::<T>(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{entity} {id}")))?;
    to_json(record)
}

pub async fn list_records(
    State(state): State<AppState>,
    PathParams(entity): PathParams<String>,
) -> Result<Json<Value>, AppError> {
    match entity.parse::<EntityKind>()? {
        EntityKind::Teachers => list_as::<Teacher>(&state).await,
        EntityKind::Batches => list_as::<Batch>(&state).await,
        EntityKind::Subjects => list_as::<Subject>(&state).await,
        EntityKind::Rooms => list_as::<Room>(&state).await,
        EntityKind::SubjectOfferings => list_as::<SubjectOffering>(&state).await,
    }
}

pub async fn get_record(
    State(state): State<AppState>,
    PathParams((entity, id)): PathParams<(String, i64)>,
) -> Result<Json<Value>, AppError> {
    match entity.parse::<EntityKind>()? {
        EntityKind::Teachers => get_as::<Teacher>(&state, &entity, id).await,
        EntityKind::Batches => get_as::<Batch>(&state, &entity, id).await,
        EntityKind::Subjects => get_as::<Subject>(&state, &entity, id).await,
        EntityKind::Rooms => get_as::<Room>(&state, &entity, id).await,
        EntityKind::SubjectOfferings => get_as::<SubjectOffering>(&state, &entity, id).await,
    }
}

pub async fn create_record(
    State(state): State<AppState>,
    PathParams(entity): PathParams<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, AppError> {
    let db = &state.db;
    match entity.parse::<EntityKind>()? {
        EntityKind::Teachers => to_json(repository::insert_teacher(db, parse_body(body)?).await?),
        EntityKind::Batches => to_json(repository::insert_batch(db, parse_body(body)?).await?),
        EntityKind::Subjects => to_json(repository::insert_subject(db, parse_body(body)?).await?),
        EntityKind::Rooms => to_json(repository::insert_room(db, parse_body(body)?).await?),
        EntityKind::SubjectOfferings => {
            to_json(repository::insert_offering(db, parse_body(body)?).await?)
        }
    }
}

pub async fn delete_record(
    State(state): State<AppState>,
    PathParams((entity, id)): PathParams<(String, i64)>,
) -> Result<StatusCode, AppError> {
    let db = &state.db;
    let deleted = match entity.parse::<EntityKind>()? {
        EntityKind::Teachers => repository::delete::<Teacher>(db, id).await?,
        EntityKind::Batches => repository::delete::<Batch>(db, id).await?,
        EntityKind::Subjects => repository::delete::<Subject>(db, id).await?,
        EntityKind::Rooms => repository::delete::<Room>(db, id).await?,
        EntityKind::SubjectOfferings => repository::delete::<SubjectOffering>(db, id).await?,
    };
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{entity} {id}")))
    }
}
