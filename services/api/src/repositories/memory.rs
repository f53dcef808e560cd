//! In-process storage backend
//!
//! Keeps every table in a `Vec` behind one async mutex. Rows stay in
//! insertion order, which matches the `created_at, id` ordering of the
//! PostgreSQL repositories.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AgendaTemplateRepository, CourseRepository, DomainRepository, MeetingRepository,
    MentorshipRepository, ReportRepository, SkillRepository, UniqueViolation, UserRepository,
};
use crate::models::{
    AgendaTemplate, Course, Domain, Meeting, Mentorship, MentorshipStatus, NewAgendaTemplate,
    NewCourse, NewDomain, NewMeeting, NewMentorship, NewProgressReport, NewSkill, NewUser,
    Pagination, ProgressReport, Role, Skill, UpdateAgendaTemplate, UpdateCourse, UpdateDomain,
    UpdateMeeting, UpdateMentorship, UpdateProgressReport, UpdateSkill, UpdateUser, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    domains: Vec<Domain>,
    courses: Vec<Course>,
    skills: Vec<Skill>,
    mentorships: Vec<Mentorship>,
    meetings: Vec<Meeting>,
    templates: Vec<AgendaTemplate>,
    reports: Vec<ProgressReport>,
}

/// Memory-backed implementation of every repository trait
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    /// Uniqueness of email and username among users other than `except`
    fn check_unique(
        &self,
        except: Option<Uuid>,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Result<(), UniqueViolation> {
        let others = || self.users.iter().filter(move |u| Some(u.id) != except);
        if let Some(email) = email {
            if others().any(|u| u.email == email) {
                return Err(UniqueViolation::Email);
            }
        }
        if let Some(username) = username {
            if others().any(|u| u.username == username) {
                return Err(UniqueViolation::Username);
            }
        }
        Ok(())
    }
}

fn remove_by<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    rows.iter().position(pred).map(|index| rows.remove(index))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;
        tables.check_unique(None, Some(&new_user.email), Some(&new_user.username))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            is_active: new_user.is_active,
            profile_picture: new_user.profile_picture.clone(),
            bio: new_user.bio.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_username_or_email(&self, username_or_email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username_or_email || u.email == username_or_email)
            .cloned())
    }

    async fn list(&self, role: Option<Role>, page: Pagination) -> Result<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(
            tables
                .users
                .iter()
                .filter(|u| role.is_none_or(|r| u.role == r)),
        ))
    }

    async fn update(&self, id: Uuid, update: &UpdateUser) -> Result<Option<User>> {
        let mut tables = self.tables.lock().await;
        tables.check_unique(Some(id), update.email.as_deref(), update.username.as_deref())?;

        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            update.apply_to(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.users, |u| u.id == id))
    }

    async fn count(&self, role: Option<Role>) -> Result<i64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .count() as i64)
    }
}

#[async_trait]
impl DomainRepository for MemoryStore {
    async fn create(&self, new_domain: &NewDomain) -> Result<Domain> {
        let now = Utc::now();
        let domain = Domain {
            id: Uuid::new_v4(),
            name: new_domain.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.domains.push(domain.clone());
        Ok(domain)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Domain>> {
        let tables = self.tables.lock().await;
        Ok(tables.domains.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Domain>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(tables.domains.iter()))
    }

    async fn update(&self, id: Uuid, update: &UpdateDomain) -> Result<Option<Domain>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.domains.iter_mut().find(|d| d.id == id).map(|domain| {
            update.apply_to(domain);
            domain.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Domain>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.domains, |d| d.id == id))
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn create(&self, new_course: &NewCourse) -> Result<Course> {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            name: new_course.name.clone(),
            description: new_course.description.clone(),
            link: new_course.link.clone(),
            domain_id: new_course.domain_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.courses.push(course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        let tables = self.tables.lock().await;
        Ok(tables.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Course>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(tables.courses.iter()))
    }

    async fn update(&self, id: Uuid, update: &UpdateCourse) -> Result<Option<Course>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.courses.iter_mut().find(|c| c.id == id).map(|course| {
            update.apply_to(course);
            course.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Course>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.courses, |c| c.id == id))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.lock().await.courses.len() as i64)
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create(&self, new_skill: &NewSkill) -> Result<Skill> {
        let now = Utc::now();
        let skill = Skill {
            id: Uuid::new_v4(),
            name: new_skill.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.skills.push(skill.clone());
        Ok(skill)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>> {
        let tables = self.tables.lock().await;
        Ok(tables.skills.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Skill>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(tables.skills.iter()))
    }

    async fn update(&self, id: Uuid, update: &UpdateSkill) -> Result<Option<Skill>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.skills.iter_mut().find(|s| s.id == id).map(|skill| {
            update.apply_to(skill);
            skill.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Skill>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.skills, |s| s.id == id))
    }
}

#[async_trait]
impl MentorshipRepository for MemoryStore {
    async fn create(&self, new_mentorship: &NewMentorship) -> Result<Mentorship> {
        let now = Utc::now();
        let mentorship = Mentorship {
            id: Uuid::new_v4(),
            mentor_id: new_mentorship.mentor_id,
            mentee_id: new_mentorship.mentee_id,
            course_id: new_mentorship.course_id,
            status: MentorshipStatus::Pending,
            start_date: new_mentorship.start_date,
            end_date: new_mentorship.end_date,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.mentorships.push(mentorship.clone());
        Ok(mentorship)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>> {
        let tables = self.tables.lock().await;
        Ok(tables.mentorships.iter().find(|m| m.id == id).cloned())
    }

    async fn list_for_mentor(&self, mentor_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(tables.mentorships.iter().filter(|m| m.mentor_id == mentor_id)))
    }

    async fn list_for_mentee(&self, mentee_id: Uuid, page: Pagination) -> Result<Vec<Mentorship>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(tables.mentorships.iter().filter(|m| m.mentee_id == mentee_id)))
    }

    async fn update(&self, id: Uuid, update: &UpdateMentorship) -> Result<Option<Mentorship>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .mentorships
            .iter_mut()
            .find(|m| m.id == id)
            .map(|mentorship| {
                update.apply_to(mentorship);
                mentorship.clone()
            }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .mentorships
            .iter_mut()
            .find(|m| m.id == id && m.status == from)
            .map(|mentorship| {
                mentorship.status = to;
                mentorship.updated_at = Utc::now();
                mentorship.clone()
            }))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.lock().await.mentorships.len() as i64)
    }
}

#[async_trait]
impl MeetingRepository for MemoryStore {
    async fn create(&self, new_meeting: &NewMeeting) -> Result<Meeting> {
        let now = Utc::now();
        let meeting = Meeting {
            id: Uuid::new_v4(),
            mentorship_id: new_meeting.mentorship_id,
            agenda: new_meeting.agenda.clone(),
            meeting_date: new_meeting.meeting_date,
            link: new_meeting.link.clone(),
            summary: new_meeting.summary.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>> {
        let tables = self.tables.lock().await;
        Ok(tables.meetings.iter().find(|m| m.id == id).cloned())
    }

    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Meeting>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(
            tables
                .meetings
                .iter()
                .filter(|m| m.mentorship_id == mentorship_id),
        ))
    }

    async fn update(&self, id: Uuid, update: &UpdateMeeting) -> Result<Option<Meeting>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.meetings.iter_mut().find(|m| m.id == id).map(|meeting| {
            update.apply_to(meeting);
            meeting.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Meeting>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.meetings, |m| m.id == id))
    }
}

#[async_trait]
impl AgendaTemplateRepository for MemoryStore {
    async fn create(&self, new_template: &NewAgendaTemplate) -> Result<AgendaTemplate> {
        let now = Utc::now();
        let template = AgendaTemplate {
            id: Uuid::new_v4(),
            mentor_id: new_template.mentor_id,
            name: new_template.name.clone(),
            content: new_template.content.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.templates.push(template.clone());
        Ok(template)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgendaTemplate>> {
        let tables = self.tables.lock().await;
        Ok(tables.templates.iter().find(|t| t.id == id).cloned())
    }

    async fn list(
        &self,
        mentor_id: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<AgendaTemplate>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(
            tables
                .templates
                .iter()
                .filter(|t| mentor_id.is_none_or(|id| t.mentor_id == id)),
        ))
    }

    async fn update(
        &self,
        id: Uuid,
        update: &UpdateAgendaTemplate,
    ) -> Result<Option<AgendaTemplate>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.templates.iter_mut().find(|t| t.id == id).map(|template| {
            update.apply_to(template);
            template.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AgendaTemplate>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.templates, |t| t.id == id))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn create(&self, new_report: &NewProgressReport) -> Result<ProgressReport> {
        let now = Utc::now();
        let report = ProgressReport {
            id: Uuid::new_v4(),
            mentorship_id: new_report.mentorship_id,
            report_text: new_report.report_text.clone(),
            report_date: new_report.report_date,
            ai_insights: new_report.ai_insights.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.reports.push(report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProgressReport>> {
        let tables = self.tables.lock().await;
        Ok(tables.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn list_for_mentorship(
        &self,
        mentorship_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<ProgressReport>> {
        let tables = self.tables.lock().await;
        Ok(page.apply(
            tables
                .reports
                .iter()
                .filter(|r| r.mentorship_id == mentorship_id),
        ))
    }

    async fn update(
        &self,
        id: Uuid,
        update: &UpdateProgressReport,
    ) -> Result<Option<ProgressReport>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.reports.iter_mut().find(|r| r.id == id).map(|report| {
            update.apply_to(report);
            report.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<ProgressReport>> {
        let mut tables = self.tables.lock().await;
        Ok(remove_by(&mut tables.reports, |r| r.id == id))
    }
}
