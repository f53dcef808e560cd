//! Domain, course and skill repositories

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{
    Course, Domain, NewCourse, NewDomain, NewSkill, Pagination, Skill, UpdateCourse,
    UpdateDomain, UpdateSkill,
};

#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn create(&self, new_domain: &NewDomain) -> Result<Domain>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Domain>>;
    async fn list(&self, page: Pagination) -> Result<Vec<Domain>>;
    async fn update(&self, id: Uuid, update: &UpdateDomain) -> Result<Option<Domain>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Domain>>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, new_course: &NewCourse) -> Result<Course>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>>;
    async fn list(&self, page: Pagination) -> Result<Vec<Course>>;
    async fn update(&self, id: Uuid, update: &UpdateCourse) -> Result<Option<Course>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Course>>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create(&self, new_skill: &NewSkill) -> Result<Skill>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>>;
    async fn list(&self, page: Pagination) -> Result<Vec<Skill>>;
    async fn update(&self, id: Uuid, update: &UpdateSkill) -> Result<Option<Skill>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Skill>>;
}

fn map_domain(row: &PgRow) -> Result<Domain> {
    Ok(Domain {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_course(row: &PgRow) -> Result<Course> {
    Ok(Course {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        link: row.try_get("link")?,
        domain_id: row.try_get("domain_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_skill(row: &PgRow) -> Result<Skill> {
    Ok(Skill {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL domain repository
#[derive(Clone)]
pub struct PgDomainRepository {
    pool: PgPool,
}

impl PgDomainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for PgDomainRepository {
    async fn create(&self, new_domain: &NewDomain) -> Result<Domain> {
        let row = sqlx::query(
            r#"
            INSERT INTO domains (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&new_domain.name)
        .fetch_one(&self.pool)
        .await?;

        map_domain(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Domain>> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM domains WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_domain).transpose()
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Domain>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM domains
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_domain).collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateDomain) -> Result<Option<Domain>> {
        let row = sqlx::query(
            r#"
            UPDATE domains
            SET name = COALESCE($2, name), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_domain).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Domain>> {
        let row = sqlx::query(
            "DELETE FROM domains WHERE id = $1 RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_domain).transpose()
    }
}

const COURSE_COLUMNS: &str = "id, name, description, link, domain_id, created_at, updated_at";

/// PostgreSQL course repository
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, new_course: &NewCourse) -> Result<Course> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO courses (name, description, link, domain_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(&new_course.name)
        .bind(&new_course.description)
        .bind(&new_course.link)
        .bind(new_course.domain_id)
        .fetch_one(&self.pool)
        .await?;

        map_course(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        let row = sqlx::query(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_course).transpose()
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Course>> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at, id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_course).collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateCourse) -> Result<Option<Course>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE courses
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                link = COALESCE($4, link),
                domain_id = COALESCE($5, domain_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.link)
        .bind(update.domain_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_course).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Course>> {
        let row = sqlx::query(&format!(
            "DELETE FROM courses WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_course).transpose()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// PostgreSQL skill repository
#[derive(Clone)]
pub struct PgSkillRepository {
    pool: PgPool,
}

impl PgSkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillRepository for PgSkillRepository {
    async fn create(&self, new_skill: &NewSkill) -> Result<Skill> {
        let row = sqlx::query(
            r#"
            INSERT INTO skills (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&new_skill.name)
        .fetch_one(&self.pool)
        .await?;

        map_skill(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_skill).transpose()
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Skill>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM skills
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.skip as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_skill).collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateSkill) -> Result<Option<Skill>> {
        let row = sqlx::query(
            r#"
            UPDATE skills
            SET name = COALESCE($2, name), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_skill).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Skill>> {
        let row = sqlx::query(
            "DELETE FROM skills WHERE id = $1 RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_skill).transpose()
    }
}
