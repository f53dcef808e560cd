//! Meeting and agenda template models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Pagination;

/// Scheduled meeting within a mentorship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub mentorship_id: Uuid,
    pub agenda: String,
    pub meeting_date: DateTime<Utc>,
    /// Video call link
    pub link: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub mentorship_id: Uuid,
    pub agenda: String,
    pub meeting_date: DateTime<Utc>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMeeting {
    pub agenda: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

impl UpdateMeeting {
    pub fn apply_to(&self, meeting: &mut Meeting) {
        if let Some(agenda) = &self.agenda {
            meeting.agenda = agenda.clone();
        }
        if let Some(meeting_date) = self.meeting_date {
            meeting.meeting_date = meeting_date;
        }
        if let Some(link) = &self.link {
            meeting.link = Some(link.clone());
        }
        if let Some(summary) = &self.summary {
            meeting.summary = Some(summary.clone());
        }
        meeting.updated_at = Utc::now();
    }
}

/// Reusable agenda text owned by a mentor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaTemplate {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Template creation request
///
/// Mentors may omit `mentor_id`; admins must name the owning mentor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub mentor_id: Option<Uuid>,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewAgendaTemplate {
    pub mentor_id: Uuid,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgendaTemplate {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl UpdateAgendaTemplate {
    pub fn apply_to(&self, template: &mut AgendaTemplate) {
        if let Some(name) = &self.name {
            template.name = name.clone();
        }
        if let Some(content) = &self.content {
            template.content = content.clone();
        }
        template.updated_at = Utc::now();
    }
}

/// Query parameters for template listing
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TemplateQuery {
    pub mentor_id: Option<Uuid>,
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "super::default_limit")]
    pub limit: u32,
}

impl TemplateQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}
