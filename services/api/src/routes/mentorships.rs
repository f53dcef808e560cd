//! Mentorship application and lifecycle routes

use axum::{Router, extract::State, http::StatusCode, routing::{get, post, put}};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{
        ExtendDeadlineQuery, Mentorship, MentorshipStatus, NewMentorship, Pagination, Role,
        UpdateMentorship,
    },
    policy::{Access, authorize},
};

const NOT_THE_MENTOR: &str = "Only the mentor can manage this mentorship";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mentorships", post(apply))
        .route("/mentorships/mentor/:id", get(list_for_mentor))
        .route("/mentorships/mentee/:id", get(list_for_mentee))
        .route(
            "/mentorships/:id",
            get(get_mentorship).put(update_mentorship),
        )
        .route("/mentorships/:id/accept", put(accept))
        .route("/mentorships/:id/reject", put(reject))
        .route("/mentorships/:id/extend_deadline", put(extend_deadline))
}

/// Load a mentorship or fail with 404
pub(crate) async fn load(state: &AppState, id: Uuid) -> ApiResult<Mentorship> {
    state
        .repositories
        .mentorships
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Mentorship"))
}

/// Both parties of a mentorship, as a participant rule
pub(crate) fn participants(mentorship: &Mentorship) -> Access {
    Access::Participant {
        mentor_id: mentorship.mentor_id,
        mentee_id: mentorship.mentee_id,
    }
}

pub(crate) fn mentor_of(mentorship: &Mentorship) -> Access {
    Access::MentorOf {
        mentor_id: mentorship.mentor_id,
    }
}

async fn ensure_role(state: &AppState, id: Uuid, role: Role, message: &str) -> ApiResult<()> {
    match state.repositories.users.find_by_id(id).await? {
        Some(user) if user.role == role => Ok(()),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// A mentee applies for a mentorship; it starts `pending`
pub async fn apply(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewMentorship>,
) -> ApiResult<(StatusCode, Json<Mentorship>)> {
    authorize(
        &caller,
        Access::MenteeSelf {
            mentee_id: payload.mentee_id,
        },
        "Mentees can only apply for themselves",
    )?;

    ensure_role(&state, payload.mentor_id, Role::Mentor, "Invalid mentor ID").await?;
    ensure_role(&state, payload.mentee_id, Role::Mentee, "Invalid mentee ID").await?;
    if state
        .repositories
        .courses
        .find_by_id(payload.course_id)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request("Invalid course ID"));
    }

    let mentorship = state.repositories.mentorships.create(&payload).await?;
    info!(
        "Mentee {} applied to mentor {} (mentorship {})",
        mentorship.mentee_id, mentorship.mentor_id, mentorship.id
    );

    Ok((StatusCode::CREATED, Json(mentorship)))
}

pub async fn get_mentorship(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Mentorship>> {
    let mentorship = load(&state, id).await?;
    authorize(
        &caller,
        participants(&mentorship),
        "Not authorized to view this mentorship",
    )?;

    Ok(Json(mentorship))
}

/// Mentor moves the start or end date
pub async fn update_mentorship(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMentorship>,
) -> ApiResult<Json<Mentorship>> {
    let mentorship = load(&state, id).await?;
    authorize(&caller, mentor_of(&mentorship), NOT_THE_MENTOR)?;

    save(&state, id, &payload).await.map(Json)
}

async fn save(state: &AppState, id: Uuid, update: &UpdateMentorship) -> ApiResult<Mentorship> {
    state
        .repositories
        .mentorships
        .update(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Mentorship"))
}

pub async fn list_for_mentor(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(mentor_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Mentorship>>> {
    authorize(
        &caller,
        Access::SelfOrAdmin { user_id: mentor_id },
        "Not authorized to view these mentorships",
    )?;

    let mentorships = state
        .repositories
        .mentorships
        .list_for_mentor(mentor_id, page)
        .await?;
    Ok(Json(mentorships))
}

pub async fn list_for_mentee(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(mentee_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Mentorship>>> {
    authorize(
        &caller,
        Access::SelfOrAdmin { user_id: mentee_id },
        "Not authorized to view these mentorships",
    )?;

    let mentorships = state
        .repositories
        .mentorships
        .list_for_mentee(mentee_id, page)
        .await?;
    Ok(Json(mentorships))
}

async fn decide(
    caller: &AuthUser,
    state: &AppState,
    id: Uuid,
    target: MentorshipStatus,
) -> ApiResult<Mentorship> {
    let mentorship = load(state, id).await?;
    authorize(caller, mentor_of(&mentorship), NOT_THE_MENTOR)?;

    let Some(status) = mentorship.transition_to(target)? else {
        return Ok(mentorship);
    };

    let repository = &state.repositories.mentorships;
    if let Some(updated) = repository.set_status(id, mentorship.status, status).await? {
        info!("Mentorship {} is now {}", id, status);
        return Ok(updated);
    }

    // Decided by a concurrent request since it was loaded
    let current = load(state, id).await?;
    match current.transition_to(target)? {
        None => Ok(current),
        Some(_) => Err(ApiError::Conflict(format!(
            "Mentorship {} changed while being decided",
            id
        ))),
    }
}

pub async fn accept(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Mentorship>> {
    decide(&caller, &state, id, MentorshipStatus::Accepted)
        .await
        .map(Json)
}

pub async fn reject(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Mentorship>> {
    decide(&caller, &state, id, MentorshipStatus::Rejected)
        .await
        .map(Json)
}

/// Push `end_date` by `extend_days` (negative values pull it in)
pub async fn extend_deadline(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExtendDeadlineQuery>,
) -> ApiResult<Json<Mentorship>> {
    let mentorship = load(&state, id).await?;
    authorize(&caller, mentor_of(&mentorship), NOT_THE_MENTOR)?;

    let end_date = mentorship.extended_end_date(query.extend_days)?;
    let updated = save(&state, id, &UpdateMentorship::end_date(end_date)).await?;
    info!("Mentorship {} now ends on {}", id, end_date);

    Ok(Json(updated))
}
