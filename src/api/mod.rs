mod data;
mod extract;

use axum::Json;
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::api::extract::{JsonBody, PathParams, QueryParams};
use crate::error::AppError;
use crate::models::*;
use crate::services::TimetableService;
use crate::state::AppState;

#[derive(Deserialize)]
struct GenerateParams {
    batch_id: BatchId,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/timetables", get(list_timetables))
        .route("/timetables/{id}", get(get_timetable).delete(delete_timetable))
        .route("/timetables/generate", post(generate_timetable))
        .route("/timetables/generate-all", post(generate_all_timetables))
        .route("/timetables/regenerate/{batch_id}", post(regenerate_timetable))
        .route("/timetables/update/{entry_id}", patch(update_entry))
        .route("/data/{entity}", get(data::list_records).post(data::create_record))
        .route("/data/{entity}/{id}", get(data::get_record).delete(data::delete_record))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_timetables(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimetableSummary>>, AppError> {
    let timetables = TimetableService::new(&state).list().await?;
    Ok(Json(timetables))
}

async fn get_timetable(
    State(state): State<AppState>,
    PathParams(id): PathParams<TimetableId>,
) -> Result<Json<TimetableDetail>, AppError> {
    let detail = TimetableService::new(&state).get(id).await?;
    Ok(Json(detail))
}

async fn generate_timetable(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<GenerateParams>,
) -> Result<Json<Timetable>, AppError> {
    let timetable = TimetableService::new(&state).generate(params.batch_id).await?;
    Ok(Json(timetable))
}

async fn generate_all_timetables(
    State(state): State<AppState>,
) -> Result<Json<Vec<Timetable>>, AppError> {
    let timetables = TimetableService::new(&state).generate_all().await?;
    Ok(Json(timetables))
}

async fn regenerate_timetable(
    State(state): State<AppState>,
    PathParams(batch_id): PathParams<BatchId>,
) -> Result<Json<RegenerateResponse>, AppError> {
    let response = TimetableService::new(&state).regenerate(batch_id).await?;
    Ok(Json(response))
}

async fn delete_timetable(
    State(state): State<AppState>,
    PathParams(id): PathParams<TimetableId>,
) -> Result<StatusCode, AppError> {
    TimetableService::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_entry(
    State(state): State<AppState>,
    PathParams(entry_id): PathParams<EntryId>,
    JsonBody(req): JsonBody<UpdateEntryRequest>,
) -> Result<Json<EntryView>, AppError> {
    let view = TimetableService::new(&state).update_entry(entry_id, req).await?;
    Ok(Json(view))
}
