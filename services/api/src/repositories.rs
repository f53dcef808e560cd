//! Repositories for database operations

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

pub mod catalog;
pub mod meeting;
pub mod memory;
pub mod mentorship;
pub mod report;
pub mod user;

pub use catalog::{CourseRepository, DomainRepository, SkillRepository};
pub use meeting::{AgendaTemplateRepository, MeetingRepository};
pub use memory::MemoryStore;
pub use mentorship::MentorshipRepository;
pub use report::ReportRepository;
pub use user::UserRepository;

/// A write collided with an existing account
///
/// Returned inside the repositories' `anyhow::Error` so callers can
/// downcast it into a conflict.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniqueViolation {
    #[error("Email already registered")]
    Email,
    #[error("Username already taken")]
    Username,
}

/// Handles to every table, shared by all handlers
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub domains: Arc<dyn DomainRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub mentorships: Arc<dyn MentorshipRepository>,
    pub meetings: Arc<dyn MeetingRepository>,
    pub templates: Arc<dyn AgendaTemplateRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(user::PgUserRepository::new(pool.clone())),
            domains: Arc::new(catalog::PgDomainRepository::new(pool.clone())),
            courses: Arc::new(catalog::PgCourseRepository::new(pool.clone())),
            skills: Arc::new(catalog::PgSkillRepository::new(pool.clone())),
            mentorships: Arc::new(mentorship::PgMentorshipRepository::new(pool.clone())),
            meetings: Arc::new(meeting::PgMeetingRepository::new(pool.clone())),
            templates: Arc::new(meeting::PgAgendaTemplateRepository::new(pool.clone())),
            reports: Arc::new(report::PgReportRepository::new(pool)),
        }
    }

    /// Repositories backed by a single fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());

        Self {
            users: store.clone(),
            domains: store.clone(),
            courses: store.clone(),
            skills: store.clone(),
            mentorships: store.clone(),
            meetings: store.clone(),
            templates: store.clone(),
            reports: store,
        }
    }
}
