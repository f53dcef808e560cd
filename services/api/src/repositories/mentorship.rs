//! Mentorship repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Mentorship, MentorshipStatus, NewMentorship, Pagination, UpdateMentorship};

#[async_trait]
pub trait MentorshipRepository: Send + Sync {
    /// Insert a new mentorship in the `pending` state
    async fn create(&self, new_mentorship: &NewMentorship) -> Result<Mentorship>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>>;
    async fn list_for_mentor(&self, mentor_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>>;
    async fn list_for_mentee(&self, mentee_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>>;
    async fn update(&self, id: Uuid, update: &UpdateMentorship) -> Result<Option<Mentorship>>;
    /// Move from `from` to `to`; `None` when the row is missing or no longer in `from`
    async fn set_status(
        &self,
        id: Uuid,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>>;
    async fn count(&self) -> Result<i64>;
}

const MENTORSHIP_COLUMNS: &str =
    "id, mentor_id, mentee_id, course_id, status, start_date, end_date, created_at, updated_at";

fn map_mentorship(row: &PgRow) -> Result<Mentorship> {
    let status: String = row.try_get("status")?;

    Ok(Mentorship {
        id: row.try_get("id")?,
        mentor_id: row.try_get("mentor_id")?,
        mentee_id: row.try_get("mentee_id")?,
        course_id: row.try_get("course_id")?,
        status: status.parse()?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL mentorship repository
#[derive(Clone)]
pub struct PgMentorshipRepository {
    pool: PgPool,
}

impl PgMentorshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &'static str,
        id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Mentorship>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MENTORSHIP_COLUMNS}
            FROM mentorships
            WHERE {column} = $1
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(id)
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_mentorship).collect()
    }
}

#[async_trait]
impl MentorshipRepository for PgMentorshipRepository {
    async fn create(&self, new_mentorship: &NewMentorship) -> Result<Mentorship> {
        info!(
            "Creating mentorship: mentor {} mentee {} course {}",
            new_mentorship.mentor_id, new_mentorship.mentee_id, new_mentorship.course_id
        );

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO mentorships (mentor_id, mentee_id, course_id, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MENTORSHIP_COLUMNS}
            "#
        ))
        .bind(new_mentorship.mentor_id)
        .bind(new_mentorship.mentee_id)
        .bind(new_mentorship.course_id)
        .bind(MentorshipStatus::Pending.as_str())
        .bind(new_mentorship.start_date)
        .bind(new_mentorship.end_date)
        .fetch_one(&self.pool)
        .await?;

        map_mentorship(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>> {
        let row = sqlx::query(&format!(
            "SELECT {MENTORSHIP_COLUMNS} FROM mentorships WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_mentorship).transpose()
    }

    async fn list_for_mentor(&self, mentor_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>> {
        self.list_where("mentor_id", mentor_id, page).await
    }

    async fn list_for_mentee(&self, mentee_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>> {
        self.list_where("mentee_id", mentee_id, page).await
    }

    async fn update(&self, id: Uuid, update: &UpdateMentorship) -> Result<Option<Mentorship>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE mentorships
            SET start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MENTORSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.start_date)
        .bind(update.end_date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_mentorship).transpose()
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE mentorships
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {MENTORSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_mentorship).transpose()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mentorships")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
