mod support;

use axum::http::StatusCode;
use mentorship_api::models::Role;
use serde_json::{Value, json};
use support::{error_message, spawn};
use uuid::Uuid;

#[tokio::test]
async fn test_meeting_lifecycle() {
    let app = spawn();
    let mentor = app.account("grace", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;
    let admin = app.account("admin", Role::Admin).await;
    let id = app.mentorship(&mentor, &mentee, None).await;

    let meeting = json!({
        "mentorship_id": id,
        "agenda": "Kickoff",
        "meeting_date": "2024-01-05T15:00:00Z",
        "link": "https://meet.example.com/abc"
    });

    app.server
        .post("/meetings")
        .authorization_bearer(&mentee.token)
        .json(&meeting)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let missing = app
        .server
        .post("/meetings")
        .authorization_bearer(&mentor.token)
        .json(&json!({
            "mentorship_id": Uuid::new_v4(),
            "agenda": "Kickoff",
            "meeting_date": "2024-01-05T15:00:00Z"
        }))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(error_message(&missing.json()), "Mentorship not found");

    let created = app
        .server
        .post("/meetings")
        .authorization_bearer(&mentor.token)
        .json(&meeting)
        .await;
    created.assert_status(StatusCode::CREATED);
    let meeting_id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    for caller in [&mentee, &admin] {
        let listed: Vec<Value> = app
            .server
            .get(&format!("/meetings/mentorship/{id}"))
            .authorization_bearer(&caller.token)
            .await
            .json();
        assert_eq!(listed.len(), 1);
    }

    let updated = app
        .server
        .put(&format!("/meetings/{meeting_id}"))
        .authorization_bearer(&mentor.token)
        .json(&json!({"summary": "Agreed on goals"}))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["summary"], "Agreed on goals");
    assert_eq!(body["agenda"], "Kickoff");

    app.server
        .delete(&format!("/meetings/{meeting_id}"))
        .authorization_bearer(&admin.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .delete(&format!("/meetings/{meeting_id}"))
        .authorization_bearer(&mentor.token)
        .await
        .assert_status_ok();
    app.server
        .delete(&format!("/meetings/{meeting_id}"))
        .authorization_bearer(&mentor.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_meetings_hidden_from_outsiders() {
    let app = spawn();
    let mentor = app.account("grace", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;
    let outsider = app.account("bob", Role::Mentor).await;
    let id = app.mentorship(&mentor, &mentee, None).await;

    app.server
        .get(&format!("/meetings/mentorship/{id}"))
        .authorization_bearer(&outsider.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .get(&format!("/meetings/mentorship/{}", Uuid::new_v4()))
        .authorization_bearer(&mentor.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_templates() {
    let app = spawn();
    let admin = app.account("admin", Role::Admin).await;
    let grace = app.account("grace", Role::Mentor).await;
    let alan = app.account("alan", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;

    app.server
        .post("/meetings/create_template")
        .authorization_bearer(&mentee.token)
        .json(&json!({"name": "Intro", "content": "Goals"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let own = app
        .server
        .post("/meetings/create_template")
        .authorization_bearer(&grace.token)
        .json(&json!({"name": "Intro", "content": "Goals"}))
        .await;
    own.assert_status(StatusCode::CREATED);
    let own: Value = own.json();
    assert_eq!(own["mentor_id"], grace.id().to_string());

    app.server
        .post("/meetings/create_template")
        .authorization_bearer(&grace.token)
        .json(&json!({"mentor_id": alan.id(), "name": "Intro", "content": "Goals"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let no_owner = app
        .server
        .post("/meetings/create_template")
        .authorization_bearer(&admin.token)
        .json(&json!({"name": "Review", "content": "Progress"}))
        .await;
    no_owner.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&no_owner.json()), "Invalid mentor ID");

    app.server
        .post("/meetings/create_template")
        .authorization_bearer(&admin.token)
        .json(&json!({"mentor_id": mentee.id(), "name": "Review", "content": "Progress"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/meetings/create_template")
        .authorization_bearer(&admin.token)
        .json(&json!({"mentor_id": alan.id(), "name": "Review", "content": "Progress"}))
        .await
        .assert_status(StatusCode::CREATED);

    let all: Vec<Value> = app
        .server
        .get("/meetings/get_templates")
        .authorization_bearer(&grace.token)
        .await
        .json();
    assert_eq!(all.len(), 2);

    let alans: Vec<Value> = app
        .server
        .get("/meetings/get_templates")
        .add_query_param("mentor_id", alan.id())
        .authorization_bearer(&admin.token)
        .await
        .json();
    assert_eq!(alans.len(), 1);
    assert_eq!(alans[0]["name"], "Review");

    app.server
        .get("/meetings/get_templates")
        .authorization_bearer(&mentee.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let template_id = own["id"].as_str().unwrap();
    app.server
        .put(&format!("/meetings/templates/{template_id}"))
        .authorization_bearer(&alan.token)
        .json(&json!({"name": "Mine now"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let renamed = app
        .server
        .put(&format!("/meetings/templates/{template_id}"))
        .authorization_bearer(&grace.token)
        .json(&json!({"name": "First session"}))
        .await;
    renamed.assert_status_ok();
    let renamed: Value = renamed.json();
    assert_eq!(renamed["name"], "First session");
    assert_eq!(renamed["content"], "Goals");

    app.server
        .delete(&format!("/meetings/templates/{template_id}"))
        .authorization_bearer(&admin.token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_progress_reports() {
    let app = spawn();
    let mentor = app.account("grace", Role::Mentor).await;
    let mentee = app.account("ada", Role::Mentee).await;
    let outsider = app.account("bob", Role::Mentee).await;
    let id = app.mentorship(&mentor, &mentee, None).await;

    let report = json!({
        "mentorship_id": id,
        "report_text": "Finished the borrow checker chapter",
        "report_date": "2024-01-10"
    });

    app.server
        .post("/reports")
        .authorization_bearer(&mentee.token)
        .json(&report)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let created = app
        .server
        .post("/reports")
        .authorization_bearer(&mentor.token)
        .json(&report)
        .await;
    created.assert_status(StatusCode::CREATED);
    let report_id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    let listed: Vec<Value> = app
        .server
        .get(&format!("/reports/mentorship/{id}"))
        .authorization_bearer(&mentee.token)
        .await
        .json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["report_date"], "2024-01-10");

    app.server
        .get(&format!("/reports/mentorship/{id}"))
        .authorization_bearer(&outsider.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = app
        .server
        .put(&format!("/reports/{report_id}"))
        .authorization_bearer(&mentor.token)
        .json(&json!({"ai_insights": "Steady progress"}))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["ai_insights"], "Steady progress");
    assert_eq!(body["report_text"], "Finished the borrow checker chapter");

    app.server
        .delete(&format!("/reports/{report_id}"))
        .authorization_bearer(&mentor.token)
        .await
        .assert_status_ok();
    app.server
        .put(&format!("/reports/{report_id}"))
        .authorization_bearer(&mentor.token)
        .json(&json!({"report_text": "again"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
