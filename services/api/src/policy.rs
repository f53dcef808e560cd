//! Access rules checked by handlers before reads and writes

use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::Role,
};

pub const INSUFFICIENT_PRIVILEGES: &str = "Insufficient privileges";

/// Who may perform an operation, given the target's ownership fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admins and super admins
    Admin,
    SelfOrAdmin { user_id: Uuid },
    /// Only the mentor named on the resource; admins are not exempt
    MentorOf { mentor_id: Uuid },
    MenteeSelf { mentee_id: Uuid },
    /// Either side of a mentorship, or an admin
    Participant { mentor_id: Uuid, mentee_id: Uuid },
    MentorOrAdmin,
    OwnerOrAdmin { owner_id: Uuid },
}

impl Access {
    pub fn allows(&self, caller: &AuthUser) -> bool {
        let id = caller.id();
        match *self {
            Access::Admin => caller.is_admin(),
            Access::SelfOrAdmin { user_id } => id == user_id || caller.is_admin(),
            Access::MentorOf { mentor_id } => id == mentor_id,
            Access::MenteeSelf { mentee_id } => id == mentee_id,
            Access::Participant {
                mentor_id,
                mentee_id,
            } => id == mentor_id || id == mentee_id || caller.is_admin(),
            Access::MentorOrAdmin => caller.role() == Role::Mentor || caller.is_admin(),
            Access::OwnerOrAdmin { owner_id } => id == owner_id || caller.is_admin(),
        }
    }
}

/// Fail with 403 and `denial` unless `access` admits the caller
pub fn authorize(caller: &AuthUser, access: Access, denial: &'static str) -> ApiResult<()> {
    if access.allows(caller) {
        return Ok(());
    }

    warn!(
        "Denied {:?} to user {} ({}): {}",
        access,
        caller.id(),
        caller.role(),
        denial
    );
    Err(ApiError::Forbidden(denial.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn caller(role: Role) -> AuthUser {
        AuthUser::from(User {
            id: Uuid::new_v4(),
            username: role.as_str().to_string(),
            email: format!("{}@example.com", role.as_str()),
            password_hash: String::new(),
            role,
            is_active: true,
            profile_picture: None,
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_admin_rule() {
        assert!(Access::Admin.allows(&caller(Role::Admin)));
        assert!(Access::Admin.allows(&caller(Role::SuperAdmin)));
        assert!(!Access::Admin.allows(&caller(Role::Mentor)));
        assert!(!Access::Admin.allows(&caller(Role::Mentee)));
    }

    #[test]
    fn test_self_or_admin() {
        let mentee = caller(Role::Mentee);
        let other = Uuid::new_v4();

        assert!(Access::SelfOrAdmin { user_id: mentee.id() }.allows(&mentee));
        assert!(!Access::SelfOrAdmin { user_id: other }.allows(&mentee));
        assert!(Access::SelfOrAdmin { user_id: other }.allows(&caller(Role::Admin)));
    }

    #[test]
    fn test_mentor_of_does_not_exempt_admins() {
        let mentor = caller(Role::Mentor);
        let rule = Access::MentorOf {
            mentor_id: mentor.id(),
        };

        assert!(rule.allows(&mentor));
        assert!(!rule.allows(&caller(Role::Mentor)));
        assert!(!rule.allows(&caller(Role::Admin)));
        assert!(!rule.allows(&caller(Role::SuperAdmin)));
    }

    #[test]
    fn test_mentee_self() {
        let mentee = caller(Role::Mentee);
        assert!(Access::MenteeSelf { mentee_id: mentee.id() }.allows(&mentee));
        assert!(
            !Access::MenteeSelf {
                mentee_id: mentee.id()
            }
            .allows(&caller(Role::Admin))
        );
    }

    #[test]
    fn test_participant() {
        let mentor = caller(Role::Mentor);
        let mentee = caller(Role::Mentee);
        let rule = Access::Participant {
            mentor_id: mentor.id(),
            mentee_id: mentee.id(),
        };

        assert!(rule.allows(&mentor));
        assert!(rule.allows(&mentee));
        assert!(rule.allows(&caller(Role::Admin)));
        assert!(!rule.allows(&caller(Role::Mentee)));
    }

    #[test]
    fn test_mentor_or_admin_and_owner() {
        let mentor = caller(Role::Mentor);
        assert!(Access::MentorOrAdmin.allows(&mentor));
        assert!(Access::MentorOrAdmin.allows(&caller(Role::SuperAdmin)));
        assert!(!Access::MentorOrAdmin.allows(&caller(Role::Mentee)));

        let rule = Access::OwnerOrAdmin {
            owner_id: mentor.id(),
        };
        assert!(rule.allows(&mentor));
        assert!(rule.allows(&caller(Role::Admin)));
        assert!(!rule.allows(&caller(Role::Mentor)));
    }

    #[test]
    fn test_authorize_reports_denial() {
        let err = authorize(&caller(Role::Mentee), Access::Admin, INSUFFICIENT_PRIVILEGES)
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(ref msg) if msg == INSUFFICIENT_PRIVILEGES));
        assert!(authorize(&caller(Role::Admin), Access::Admin, INSUFFICIENT_PRIVILEGES).is_ok());
    }
}
