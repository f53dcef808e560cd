//! Progress report routes

use axum::{Router, extract::State, http::StatusCode, routing::{get, post, put}};
use tracing::info;
use uuid::Uuid;

use super::mentorships::{load, mentor_of, participants};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{NewProgressReport, Pagination, ProgressReport, UpdateProgressReport},
    policy::authorize,
};

const REPORTS_DENIED: &str = "Only the mentor can manage progress reports";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", post(create_report))
        .route("/reports/mentorship/:id", get(list_reports))
        .route("/reports/:id", put(update_report).delete(delete_report))
}

pub async fn create_report(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewProgressReport>,
) -> ApiResult<(StatusCode, Json<ProgressReport>)> {
    let mentorship = load(&state, payload.mentorship_id).await?;
    authorize(&caller, mentor_of(&mentorship), REPORTS_DENIED)?;

    let report = state.repositories.reports.create(&payload).await?;
    info!(
        "Filed progress report {} for mentorship {}",
        report.id, report.mentorship_id
    );

    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(mentorship_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<ProgressReport>>> {
    let mentorship = load(&state, mentorship_id).await?;
    authorize(
        &caller,
        participants(&mentorship),
        "Not authorized to view these reports",
    )?;

    let reports = state
        .repositories
        .reports
        .list_for_mentorship(mentorship_id, page)
        .await?;
    Ok(Json(reports))
}

async fn authorize_report(state: &AppState, caller: &AuthUser, id: Uuid) -> ApiResult<()> {
    let report = state
        .repositories
        .reports
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Progress report"))?;
    let mentorship = load(state, report.mentorship_id).await?;
    authorize(caller, mentor_of(&mentorship), REPORTS_DENIED)
}

pub async fn update_report(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProgressReport>,
) -> ApiResult<Json<ProgressReport>> {
    authorize_report(&state, &caller, id).await?;

    state
        .repositories
        .reports
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Progress report"))
}

pub async fn delete_report(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressReport>> {
    authorize_report(&state, &caller, id).await?;

    state
        .repositories
        .reports
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Progress report"))
}
