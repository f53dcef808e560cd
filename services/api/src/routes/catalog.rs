//! Domain, course and skill routes
//!
//! Reads are public. Writes are admin only.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{
        Course, Domain, NewCourse, NewDomain, NewSkill, Pagination, Skill, UpdateCourse,
        UpdateDomain, UpdateSkill,
    },
    policy::{Access, INSUFFICIENT_PRIVILEGES, authorize},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/domains", get(list_domains).post(create_domain))
        .route(
            "/domains/:id",
            get(get_domain).put(update_domain).delete(delete_domain),
        )
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/skills", get(list_skills).post(create_skill))
        .route(
            "/skills/:id",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
}

pub async fn list_domains(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Domain>>> {
    Ok(Json(state.repositories.domains.list(page).await?))
}

pub async fn get_domain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Domain>> {
    state
        .repositories
        .domains
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Domain"))
}

pub async fn create_domain(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewDomain>,
) -> ApiResult<(StatusCode, Json<Domain>)> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    let domain = state.repositories.domains.create(&payload).await?;
    info!("Created domain {}", domain.id);
    Ok((StatusCode::CREATED, Json(domain)))
}

pub async fn update_domain(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDomain>,
) -> ApiResult<Json<Domain>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    state
        .repositories
        .domains
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Domain"))
}

pub async fn delete_domain(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Domain>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    state
        .repositories
        .domains
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Domain"))
}

async fn ensure_domain(state: &AppState, domain_id: Uuid) -> ApiResult<()> {
    match state.repositories.domains.find_by_id(domain_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::bad_request("Invalid domain ID")),
    }
}

pub async fn list_courses(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Course>>> {
    Ok(Json(state.repositories.courses.list(page).await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Course>> {
    state
        .repositories
        .courses
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Course"))
}

pub async fn create_course(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewCourse>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;
    ensure_domain(&state, payload.domain_id).await?;

    let course = state.repositories.courses.create(&payload).await?;
    info!("Created course {} in domain {}", course.id, course.domain_id);
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourse>,
) -> ApiResult<Json<Course>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;
    if let Some(domain_id) = payload.domain_id {
        ensure_domain(&state, domain_id).await?;
    }

    state
        .repositories
        .courses
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Course"))
}

pub async fn delete_course(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Course>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    state
        .repositories
        .courses
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Course"))
}

pub async fn list_skills(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Skill>>> {
    Ok(Json(state.repositories.skills.list(page).await?))
}

pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Skill>> {
    state
        .repositories
        .skills
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill"))
}

pub async fn create_skill(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewSkill>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    let skill = state.repositories.skills.create(&payload).await?;
    info!("Created skill {}", skill.id);
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkill>,
) -> ApiResult<Json<Skill>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    state
        .repositories
        .skills
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill"))
}

pub async fn delete_skill(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Skill>> {
    authorize(&caller, Access::Admin, INSUFFICIENT_PRIVILEGES)?;

    state
        .repositories
        .skills
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill"))
}
