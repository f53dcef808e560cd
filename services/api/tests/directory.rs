mod support;

use axum::http::StatusCode;
use common::password::verify_password;
use mentorship_api::models::Role;
use serde_json::{Value, json};
use support::{error_message, spawn};
use uuid::Uuid;

#[tokio::test]
async fn test_admin_creates_mentor() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;
    let mentee = app.account("mentee", Role::Mentee).await;
    let payload = json!({
        "username": "grace",
        "email": "grace@example.com",
        "password": "C0mpiler!",
        "role": "mentee"
    });

    app.server
        .post("/mentors/create")
        .authorization_bearer(&mentee.token)
        .json(&payload)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let created = app
        .server
        .post("/mentors/create")
        .authorization_bearer(&admin.token)
        .json(&payload)
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["role"], "mentor");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());

    let stored = app
        .state
        .repositories
        .users
        .find_by_email("grace@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "C0mpiler!");
    assert!(verify_password("C0mpiler!", &stored.password_hash).unwrap());

    app.server
        .post("/mentors/create")
        .authorization_bearer(&admin.token)
        .json(&payload)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mentor_approval_toggles_activation() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;
    let mentor = app.account_with("grace", Role::Mentor, false).await;
    let mentee = app.account("mentee", Role::Mentee).await;

    app.server
        .get("/users/me")
        .authorization_bearer(&mentor.token)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let approved = app
        .server
        .post(&format!("/mentors/approve/{}", mentor.id()))
        .authorization_bearer(&admin.token)
        .await;
    approved.assert_status_ok();
    assert_eq!(approved.json::<Value>()["is_active"], true);

    app.server
        .get("/users/me")
        .authorization_bearer(&mentor.token)
        .await
        .assert_status_ok();

    let rejected = app
        .server
        .post(&format!("/mentors/reject/{}", mentor.id()))
        .authorization_bearer(&admin.token)
        .await;
    rejected.assert_status_ok();
    assert_eq!(rejected.json::<Value>()["is_active"], false);

    // Only mentors can be approved
    app.server
        .post(&format!("/mentors/approve/{}", mentee.id()))
        .authorization_bearer(&admin.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_directories() {
    let app = spawn();
    let mentor = app.account("grace", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;

    let mentors: Vec<Value> = app.server.get("/mentors").await.json();
    assert_eq!(mentors.len(), 1);
    assert_eq!(mentors[0]["username"], "grace");

    let mentees: Vec<Value> = app.server.get("/mentees").await.json();
    assert_eq!(mentees.len(), 1);
    assert_eq!(mentees[0]["username"], "ada");

    app.server
        .get(&format!("/mentors/{}", mentor.id()))
        .await
        .assert_status_ok();

    let wrong_role = app.server.get(&format!("/mentors/{}", mentee.id())).await;
    wrong_role.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(error_message(&wrong_role.json()), "Mentor not found");

    app.server
        .get(&format!("/mentees/{}", Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_writes_are_admin_only() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;
    let mentor = app.account("grace", Role::Mentor).await;

    app.server
        .post("/domains")
        .json(&json!({"name": "Data"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/skills")
        .authorization_bearer(&mentor.token)
        .json(&json!({"name": "SQL"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let domain = app
        .server
        .post("/domains")
        .authorization_bearer(&admin.token)
        .json(&json!({"name": "Data"}))
        .await;
    domain.assert_status(StatusCode::CREATED);
    let domain_id = domain.json::<Value>()["id"].as_str().unwrap().to_string();

    let domains: Vec<Value> = app.server.get("/domains").await.json();
    assert_eq!(domains.len(), 1);

    let renamed = app
        .server
        .put(&format!("/domains/{domain_id}"))
        .authorization_bearer(&admin.token)
        .json(&json!({"name": "Data Science"}))
        .await;
    renamed.assert_status_ok();
    assert_eq!(renamed.json::<Value>()["name"], "Data Science");

    app.server
        .delete(&format!("/domains/{domain_id}"))
        .authorization_bearer(&admin.token)
        .await
        .assert_status_ok();
    app.server
        .get(&format!("/domains/{domain_id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_requires_existing_domain() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;

    let invalid = app
        .server
        .post("/courses")
        .authorization_bearer(&admin.token)
        .json(&json!({"name": "Rust 101", "domain_id": Uuid::new_v4()}))
        .await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&invalid.json()), "Invalid domain ID");

    let domain: Value = app
        .server
        .post("/domains")
        .authorization_bearer(&admin.token)
        .json(&json!({"name": "Engineering"}))
        .await
        .json();

    let created = app
        .server
        .post("/courses")
        .authorization_bearer(&admin.token)
        .json(&json!({
            "name": "Rust 101",
            "description": "Ownership and borrowing",
            "domain_id": domain["id"]
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let course: Value = created.json();

    let updated = app
        .server
        .put(&format!("/courses/{}", course["id"].as_str().unwrap()))
        .authorization_bearer(&admin.token)
        .json(&json!({"link": "https://lms.example.com/rust"}))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["name"], "Rust 101");
    assert_eq!(updated["description"], "Ownership and borrowing");
    assert_eq!(updated["link"], "https://lms.example.com/rust");

    app.server
        .put(&format!("/courses/{}", course["id"].as_str().unwrap()))
        .authorization_bearer(&admin.token)
        .json(&json!({"domain_id": Uuid::new_v4()}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;
    let mentor = app.account("grace", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;
    app.mentorship(&mentor, &mentee, None).await;

    app.server
        .get("/admin/dashboard")
        .authorization_bearer(&mentor.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let stats = app
        .server
        .get("/admin/dashboard")
        .authorization_bearer(&admin.token)
        .await;
    stats.assert_status_ok();
    stats.assert_json(&json!({
        "total_users": 3,
        "total_mentors": 1,
        "total_mentees": 1,
        "total_courses": 1,
        "total_mentorships": 1
    }));
}
