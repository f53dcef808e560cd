//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod meeting;
pub mod mentorship;
pub mod report;
pub mod user;

pub use catalog::{
    Course, Domain, NewCourse, NewDomain, NewSkill, Skill, UpdateCourse, UpdateDomain, UpdateSkill,
};
pub use meeting::{
    AgendaTemplate, CreateTemplateRequest, Meeting, NewAgendaTemplate, NewMeeting, TemplateQuery,
    UpdateAgendaTemplate, UpdateMeeting,
};
pub use mentorship::{
    ExtendDeadlineQuery, LifecycleError, Mentorship, MentorshipStatus, NewMentorship,
    UpdateMentorship,
};
pub use report::{NewProgressReport, ProgressReport, UpdateProgressReport};
pub use user::{
    CreateUserRequest, LoginRequest, NewUser, Role, TokenResponse, UpdateUser, User,
};

const DEFAULT_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// `skip`/`limit` query parameters shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// Slice an ordered sequence the way `OFFSET skip LIMIT limit` would
    pub fn apply<'a, T: Clone + 'a>(&self, rows: impl Iterator<Item = &'a T>) -> Vec<T> {
        rows.skip(self.skip as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_mentors: i64,
    pub total_mentees: i64,
    pub total_courses: i64,
    pub total_mentorships: i64,
}
