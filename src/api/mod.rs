pub mod resource;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::db::repository::{self, SortSpec};
use crate::error::AppError;
use crate::models::{Lecture, LectureSubmission};
use crate::state::AppState;
use crate::validation::{ValidationErrors, validate_submission};
use self::resource::{LectureResource, PagedLectures};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<i64>,
    size: Option<i64>,
    sort: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/lectures", get(list_lectures).post(create_lecture))
        .route("/api/lectures/{id}", get(get_lecture).put(update_lecture))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Body parse failures surface as `JsonRejection`; routing them through the
/// error type keeps malformed input on the same translation path as every
/// other failure.
fn parse_submission(
    payload: Result<Json<LectureSubmission>, JsonRejection>,
) -> Result<LectureSubmission, AppError> {
    let Json(submission) = payload.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    Ok(submission)
}

fn validated_submission(submission: LectureSubmission) -> Result<LectureSubmission, AppError> {
    let mut errors = ValidationErrors::new();
    validate_submission(&submission, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(submission)
}

async fn get_exist_or_not(state: &AppState, id: i64) -> Result<Lecture, AppError> {
    repository::find_lecture_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound(id))
}

async fn create_lecture(
    State(state): State<AppState>,
    payload: Result<Json<LectureSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let submission = validated_submission(parse_submission(payload)?)?;

    let lecture = Lecture::from_submission(submission, Utc::now());
    let saved = repository::insert_lecture(&state.db, &lecture).await?;
    info!("created lecture {}", saved.id);

    let resource = LectureResource::new(saved)
        .with_query_link()
        .with_update_link();
    let location = resource.self_href().to_string();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(resource),
    ))
}

async fn update_lecture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<LectureSubmission>, JsonRejection>,
) -> Result<Json<LectureResource>, AppError> {
    // An unparseable body is rejected before the row lookup, but a missing
    // id wins over domain-rule violations.
    let submission = parse_submission(payload)?;
    let mut existing = get_exist_or_not(&state, id).await?;
    let submission = validated_submission(submission)?;

    existing.apply_submission(submission, Utc::now());
    repository::update_lecture(&state.db, &existing).await?;
    info!("updated lecture {id}");

    let resource = LectureResource::new(existing).with_query_link();
    Ok(Json(resource))
}

async fn get_lecture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LectureResource>, AppError> {
    let lecture = get_exist_or_not(&state, id).await?;
    Ok(Json(LectureResource::new(lecture).with_query_link()))
}

async fn list_lectures(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PagedLectures>, AppError> {
    let page = params.page.unwrap_or(0).max(0);
    let size = params
        .size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let sort = SortSpec::parse(params.sort.as_deref());

    let lectures = repository::fetch_lectures_page(&state.db, page, size, sort).await?;
    let total = repository::count_lectures(&state.db).await?;

    Ok(Json(PagedLectures::new(lectures, page, size, total)))
}
