//! Catalog models: domains, courses and skills

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject area that groups courses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDomain {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDomain {
    pub name: Option<String>,
}

impl UpdateDomain {
    pub fn apply_to(&self, domain: &mut Domain) {
        if let Some(name) = &self.name {
            domain.name = name.clone();
        }
        domain.updated_at = Utc::now();
    }
}

/// Course entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Link to the course in the learning platform
    pub link: Option<String>,
    pub domain_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub domain_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub domain_id: Option<Uuid>,
}

impl UpdateCourse {
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(name) = &self.name {
            course.name = name.clone();
        }
        if let Some(description) = &self.description {
            course.description = Some(description.clone());
        }
        if let Some(link) = &self.link {
            course.link = Some(link.clone());
        }
        if let Some(domain_id) = self.domain_id {
            course.domain_id = domain_id;
        }
        course.updated_at = Utc::now();
    }
}

/// Skill entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSkill {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSkill {
    pub name: Option<String>,
}

impl UpdateSkill {
    pub fn apply_to(&self, skill: &mut Skill) {
        if let Some(name) = &self.name {
            skill.name = name.clone();
        }
        skill.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_partial_update() {
        let domain_id = Uuid::new_v4();
        let mut course = Course {
            id: Uuid::new_v4(),
            name: "Rust 101".to_string(),
            description: Some("Ownership and borrowing".to_string()),
            link: None,
            domain_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let update: UpdateCourse =
            serde_json::from_str(r#"{"link": "https://lms.example.com/rust"}"#).unwrap();
        update.apply_to(&mut course);

        assert_eq!(course.name, "Rust 101");
        assert_eq!(course.description.as_deref(), Some("Ownership and borrowing"));
        assert_eq!(course.link.as_deref(), Some("https://lms.example.com/rust"));
        assert_eq!(course.domain_id, domain_id);
    }
}
