//! Progress report repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{NewProgressReport, Pagination, ProgressReport, UpdateProgressReport};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, new_report: &NewProgressReport) -> Result<ProgressReport>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProgressReport>>;
    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<ProgressReport>>;
    async fn update(
        &self,
        id: Uuid,
        update: &UpdateProgressReport,
    ) -> Result<Option<ProgressReport>>;
    async fn delete(&self, id: Uuid) -> Result<Option<ProgressReport>>;
}

const REPORT_COLUMNS: &str =
    "id, mentorship_id, report_text, report_date, ai_insights, created_at, updated_at";

fn map_report(row: &PgRow) -> Result<ProgressReport> {
    Ok(ProgressReport {
        id: row.try_get("id")?,
        mentorship_id: row.try_get("mentorship_id")?,
        report_text: row.try_get("report_text")?,
        report_date: row.try_get("report_date")?,
        ai_insights: row.try_get("ai_insights")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL progress report repository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, new_report: &NewProgressReport) -> Result<ProgressReport> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO progress_reports (mentorship_id, report_text, report_date, ai_insights)
            VALUES ($1, $2, $3, $4)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(new_report.mentorship_id)
        .bind(&new_report.report_text)
        .bind(new_report.report_date)
        .bind(&new_report.ai_insights)
        .fetch_one(&self.pool)
        .await?;

        map_report(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProgressReport>> {
        let row = sqlx::query(&format!(
            "SELECT {REPORT_COLUMNS} FROM progress_reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_report).transpose()
    }

    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<ProgressReport>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM progress_reports
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

        rows.iter().map(map_report).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        update: &UpdateProgressReport,
    ) -> Result<Option<ProgressReport>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE progress_reports
            SET report_text = COALESCE($2, report_text),
                report_date = COALESCE($3, report_date),
                ai_insights = COALESCE($4, ai_insights),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.report_text)
        .bind(update.report_date)
        .bind(&update.ai_insights)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_report).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<ProgressReport>> {
        let row = sqlx::query(&format!(
            "DELETE FROM progress_reports WHERE id = $1 RETURNING {REPORT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_report).transpose()
    }
}
