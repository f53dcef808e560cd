//! Meeting and agenda template repositories

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{
    AgendaTemplate, Meeting, NewAgendaTemplate, NewMeeting, Pagination, UpdateAgendaTemplate,
    UpdateMeeting,
};

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn create(&self, new_meeting: &NewMeeting) -> Result<Meeting>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>>;
    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Meeting>>;
    async fn update(&self, id: Uuid, update: &UpdateMeeting) -> Result<Option<Meeting>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Meeting>>;
}

#[async_trait]
pub trait AgendaTemplateRepository: Send + Sync {
    async fn create(&self, new_template: &NewAgendaTemplate) -> Result<AgendaTemplate>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgendaTemplate>>;
    /// List templates, optionally only those owned by one mentor
    async fn list(&self, mentor_id: Option<Uuid>, page: Pagination)
    -> Result<Vec<AgendaTemplate>>;
    async fn update(
        &self,
        id: Uuid,
        update: &UpdateAgendaTemplate,
    ) -> Result<Option<AgendaTemplate>>;
    async fn delete(&self, id: Uuid) -> Result<Option<AgendaTemplate>>;
}

const MEETING_COLUMNS: &str =
    "id, mentorship_id, agenda, meeting_date, link, summary, created_at, updated_at";

const TEMPLATE_COLUMNS: &str = "id, mentor_id, name, content, created_at, updated_at";

fn map_meeting(row: &PgRow) -> Result<Meeting> {
    Ok(Meeting {
        id: row.try_get("id")?,
        mentorship_id: row.try_get("mentorship_id")?,
        agenda: row.try_get("agenda")?,
        meeting_date: row.try_get("meeting_date")?,
        link: row.try_get("link")?,
        summary: row.try_get("summary")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_template(row: &PgRow) -> Result<AgendaTemplate> {
    Ok(AgendaTemplate {
        id: row.try_get("id")?,
        mentor_id: row.try_get("mentor_id")?,
        name: row.try_get("name")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL meeting repository
#[derive(Clone)]
pub struct PgMeetingRepository {
    pool: PgPool,
}

impl PgMeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingRepository for PgMeetingRepository {
    async fn create(&self, new_meeting: &NewMeeting) -> Result<Meeting> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO meetings (mentorship_id, agenda, meeting_date, link, summary)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEETING_COLUMNS}
            "#
        ))
        .bind(new_meeting.mentorship_id)
        .bind(&new_meeting.agenda)
        .bind(new_meeting.meeting_date)
        .bind(&new_meeting.link)
        .bind(&new_meeting.summary)
        .fetch_one(&self.pool)
        .await?;

        map_meeting(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>> {
        let row = sqlx::query(&format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_meeting).transpose()
    }

    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Meeting>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MEETING_COLUMNS}
            FROM meetings
            WHERE mentorship_id = $1
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(mentorship_id)
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_meeting).collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateMeeting) -> Result<Option<Meeting>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE meetings
            SET agenda = COALESCE($2, agenda),
                meeting_date = COALESCE($3, meeting_date),
                link = COALESCE($4, link),
                summary = COALESCE($5, summary),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MEETING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.agenda)
        .bind(update.meeting_date)
        .bind(&update.link)
        .bind(&update.summary)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_meeting).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Meeting>> {
        let row = sqlx::query(&format!(
            "DELETE FROM meetings WHERE id = $1 RETURNING {MEETING_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_meeting).transpose()
    }
}

/// PostgreSQL agenda template repository
#[derive(Clone)]
pub struct PgAgendaTemplateRepository {
    pool: PgPool,
}

impl PgAgendaTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaTemplateRepository for PgAgendaTemplateRepository {
    async fn create(&self, new_template: &NewAgendaTemplate) -> Result<AgendaTemplate> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO meeting_agenda_templates (mentor_id, name, content)
            VALUES ($1, $2, $3)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(new_template.mentor_id)
        .bind(&new_template.name)
        .bind(&new_template.content)
        .fetch_one(&self.pool)
        .await?;

        map_template(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgendaTemplate>> {
        let row = sqlx::query(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM meeting_agenda_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_template).transpose()
    }

    async fn list(
        &self,
        mentor_id: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<AgendaTemplate>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM meeting_agenda_templates
            WHERE ($1::UUID IS NULL OR mentor_id = $1)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(mentor_id)
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_template).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        update: &UpdateAgendaTemplate,
    ) -> Result<Option<AgendaTemplate>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE meeting_agenda_templates
            SET name = COALESCE($2, name),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.content)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_template).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AgendaTemplate>> {
        let row = sqlx::query(&format!(
            "DELETE FROM meeting_agenda_templates WHERE id = $1 RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_template).transpose()
    }
}
