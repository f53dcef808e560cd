//! Shared harness: the full router over in-memory storage

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::NaiveDate;
use common::jwt::{JwtConfig, JwtService};
use mentorship_api::{
    AppState, create_router,
    models::{NewCourse, NewDomain, NewMentorship, NewUser, Role, User},
    repositories::Repositories,
};
use serde_json::Value;
use uuid::Uuid;

const PRIVATE_KEY: &str = include_str!("../fixtures/jwt_private.pem");
const PUBLIC_KEY: &str = include_str!("../fixtures/jwt_public.pem");

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// A stored user together with a valid access token
pub struct Account {
    pub user: User,
    pub token: String,
}

impl Account {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

pub fn spawn() -> TestApp {
    let jwt = JwtService::new(JwtConfig::new(PRIVATE_KEY, PUBLIC_KEY, 900).unwrap()).unwrap();
    let state = AppState::new(Repositories::in_memory(), jwt);
    let server = TestServer::new(create_router(state.clone())).unwrap();

    TestApp { server, state }
}

impl TestApp {
    /// Insert a user directly and mint a token for it
    ///
    /// The stored hash is not a real credential; log in through
    /// `/auth/register` when the password matters.
    pub async fn account(&self, username: &str, role: Role) -> Account {
        self.account_with(username, role, true).await
    }

    pub async fn account_with(&self, username: &str, role: Role, is_active: bool) -> Account {
        let user = self
            .state
            .repositories
            .users
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "not-a-real-hash".to_string(),
                role,
                is_active,
                profile_picture: None,
                bio: None,
            })
            .await
            .unwrap();
        let token = self
            .state
            .jwt_service
            .generate_access_token(user.id, role.as_str())
            .unwrap();

        Account { user, token }
    }

    pub async fn course(&self) -> Uuid {
        let repos = &self.state.repositories;
        let domain = repos
            .domains
            .create(&NewDomain {
                name: "Engineering".to_string(),
            })
            .await
            .unwrap();
        repos
            .courses
            .create(&NewCourse {
                name: "Rust 101".to_string(),
                description: None,
                link: None,
                domain_id: domain.id,
            })
            .await
            .unwrap()
            .id
    }

    /// Pending mentorship between `mentor` and `mentee`
    pub async fn mentorship(
        &self,
        mentor: &Account,
        mentee: &Account,
        end_date: Option<NaiveDate>,
    ) -> Uuid {
        let course_id = self.course().await;
        self.state
            .repositories
            .mentorships
            .create(&NewMentorship {
                mentor_id: mentor.id(),
                mentee_id: mentee.id(),
                course_id,
                start_date: NaiveDate::from_ymd_opt(2023, 12, 1),
                end_date,
            })
            .await
            .unwrap()
            .id
    }
}

pub fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}
