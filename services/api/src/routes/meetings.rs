//! Meeting and agenda template routes

use axum::{Router, extract::State, http::StatusCode, routing::{get, post, put}};
use tracing::info;
use uuid::Uuid;

use super::mentorships::{load, mentor_of, participants};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    middleware::AuthUser,
    models::{
        AgendaTemplate, CreateTemplateRequest, Meeting, NewAgendaTemplate, NewMeeting, Pagination,
        Role, TemplateQuery, UpdateAgendaTemplate, UpdateMeeting,
    },
    policy::{Access, INSUFFICIENT_PRIVILEGES, authorize},
};

const MEETINGS_DENIED: &str = "Only the mentor can manage meetings";
const TEMPLATE_DENIED: &str = "Not authorized to manage this template";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meetings", post(create_meeting))
        .route("/meetings/mentorship/:id", get(list_meetings))
        .route("/meetings/create_template", post(create_template))
        .route("/meetings/get_templates", get(list_templates))
        .route(
            "/meetings/templates/:id",
            put(update_template).delete(delete_template),
        )
        .route("/meetings/:id", put(update_meeting).delete(delete_meeting))
}

pub async fn create_meeting(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewMeeting>,
) -> ApiResult<(StatusCode, Json<Meeting>)> {
    let mentorship = load(&state, payload.mentorship_id).await?;
    authorize(&caller, mentor_of(&mentorship), MEETINGS_DENIED)?;

    let meeting = state.repositories.meetings.create(&payload).await?;
    info!(
        "Scheduled meeting {} for mentorship {}",
        meeting.id, meeting.mentorship_id
    );

    Ok((StatusCode::CREATED, Json(meeting)))
}

pub async fn list_meetings(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(mentorship_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Meeting>>> {
    let mentorship = load(&state, mentorship_id).await?;
    authorize(
        &caller,
        participants(&mentorship),
        "Not authorized to view these meetings",
    )?;

    let meetings = state
        .repositories
        .meetings
        .list_for_mentorship(mentorship_id, page)
        .await?;
    Ok(Json(meetings))
}

/// Load a meeting and check that the caller mentors its mentorship
async fn load_owned_meeting(state: &AppState, caller: &AuthUser, id: Uuid) -> ApiResult<Meeting> {
    let meeting = state
        .repositories
        .meetings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting"))?;
    let mentorship = load(state, meeting.mentorship_id).await?;
    authorize(caller, mentor_of(&mentorship), MEETINGS_DENIED)?;

    Ok(meeting)
}

pub async fn update_meeting(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMeeting>,
) -> ApiResult<Json<Meeting>> {
    load_owned_meeting(&state, &caller, id).await?;

    state
        .repositories
        .meetings
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Meeting"))
}

pub async fn delete_meeting(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Meeting>> {
    load_owned_meeting(&state, &caller, id).await?;

    state
        .repositories
        .meetings
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Meeting"))
}

/// Decide which mentor owns a new template
///
/// Mentors always own what they create. Admins create on behalf of a
/// mentor and must name one.
async fn template_owner(
    state: &AppState,
    caller: &AuthUser,
    requested: Option<Uuid>,
) -> ApiResult<Uuid> {
    if caller.role() == Role::Mentor {
        return match requested {
            Some(mentor_id) if mentor_id != caller.id() => Err(ApiError::Forbidden(
                "Mentors can only create their own templates".to_string(),
            )),
            _ => Ok(caller.id()),
        };
    }

    let mentor_id = requested.ok_or_else(|| ApiError::bad_request("Invalid mentor ID"))?;
    match state.repositories.users.find_by_id(mentor_id).await? {
        Some(user) if user.role == Role::Mentor => Ok(mentor_id),
        _ => Err(ApiError::bad_request("Invalid mentor ID")),
    }
}

pub async fn create_template(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<AgendaTemplate>)> {
    authorize(&caller, Access::MentorOrAdmin, INSUFFICIENT_PRIVILEGES)?;
    let mentor_id = template_owner(&state, &caller, payload.mentor_id).await?;

    let template = state
        .repositories
        .templates
        .create(&NewAgendaTemplate {
            mentor_id,
            name: payload.name,
            content: payload.content,
        })
        .await?;
    info!("Created agenda template {} for mentor {}", template.id, mentor_id);

    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn list_templates(
    caller: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> ApiResult<Json<Vec<AgendaTemplate>>> {
    authorize(&caller, Access::MentorOrAdmin, INSUFFICIENT_PRIVILEGES)?;

    let templates = state
        .repositories
        .templates
        .list(query.mentor_id, query.pagination())
        .await?;
    Ok(Json(templates))
}

async fn load_owned_template(
    state: &AppState,
    caller: &AuthUser,
    id: Uuid,
) -> ApiResult<AgendaTemplate> {
    let template = state
        .repositories
        .templates
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Template"))?;
    authorize(
        caller,
        Access::OwnerOrAdmin {
            owner_id: template.mentor_id,
        },
        TEMPLATE_DENIED,
    )?;

    Ok(template)
}

pub async fn update_template(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAgendaTemplate>,
) -> ApiResult<Json<AgendaTemplate>> {
    load_owned_template(&state, &caller, id).await?;

    state
        .repositories
        .templates
        .update(id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Template"))
}

pub async fn delete_template(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AgendaTemplate>> {
    load_owned_template(&state, &caller, id).await?;

    state
        .repositories
        .templates
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Template"))
}
