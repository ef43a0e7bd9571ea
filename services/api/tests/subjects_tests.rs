mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{app, get, json_body, post_json, send, MemoryDb};
use serde_json::json;
use std::sync::Arc;
use study_tracker_core::subject_select::{Effect, SelectEvent, SelectState, SubjectSelect};
use study_tracker_core::{Subject, SubjectColor};
use uuid::Uuid;

#[tokio::test]
async fn blank_names_never_reach_the_database() {
    let db = Arc::new(MemoryDb::default());
    let (_, token) = db.sign_in_user(Duration::days(30));
    let app = app(db.clone());

    for name in ["", "   ", "\t\n"] {
        let response = send(
            &app,
            post_json("/subjects", Some(token.as_str()), json!({ "name": name })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
    }
    assert_eq!(db.create_subject_calls(), 0);
}

#[tokio::test]
async fn creates_subject_with_chosen_color_and_lists_by_name() {
    let db = Arc::new(MemoryDb::default());
    let (user_id, token) = db.sign_in_user(Duration::days(30));
    db.insert_subject(user_id, "Physics");
    let app = app(db);

    let response = send(
        &app,
        post_json(
            "/subjects",
            Some(token.as_str()),
            json!({ "name": "  Biology ", "color": "#3b82f6" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["subject"]["name"], "Biology");
    assert_eq!(body["subject"]["color"], "#3b82f6");

    let response = send(&app, get("/subjects", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Biology", "Physics"]);
}

#[tokio::test]
async fn color_defaults_to_cyan_and_rejects_off_palette_values() {
    let db = Arc::new(MemoryDb::default());
    let (_, token) = db.sign_in_user(Duration::days(30));
    let app = app(db.clone());

    let response = send(
        &app,
        post_json("/subjects", Some(token.as_str()), json!({ "name": "Art" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["subject"]["color"], "#06b6d4");

    let response = send(
        &app,
        post_json(
            "/subjects",
            Some(token.as_str()),
            json!({ "name": "Art", "color": "#000000" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("subject").is_none());
    assert_eq!(db.create_subject_calls(), 1);
}

#[tokio::test]
async fn subjects_are_scoped_to_their_owner() {
    let db = Arc::new(MemoryDb::default());
    let (alice, _) = db.sign_in_user(Duration::days(30));
    let (_, bob_token) = db.sign_in_user(Duration::days(30));
    db.insert_subject(alice, "Alice's Latin");
    let app = app(db);

    let response = send(&app, get("/subjects", Some(bob_token.as_str()))).await;
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

/// Drives the picker against the API: effects are executed by calling the
/// creation endpoint and, for a refresh, reloading the subject list.
#[tokio::test]
async fn picker_creation_flow_selects_new_subject_and_refreshes_once() {
    let db = Arc::new(MemoryDb::default());
    let (user_id, token) = db.sign_in_user(Duration::days(30));
    let app = app(db);

    let mut subjects: Vec<Subject> = Vec::new();
    let mut picker = SubjectSelect::new(None, false);
    let mut selections: Vec<Option<Uuid>> = Vec::new();
    let mut refreshes = 0;

    picker.handle(SelectEvent::TriggerClicked);
    picker.handle(SelectEvent::CreateRequested);
    picker.handle(SelectEvent::NameEdited("Biology".into()));
    picker.handle(SelectEvent::ColorPicked(SubjectColor::Blue));

    let mut pending = picker.handle(SelectEvent::Submit);
    while let Some(effect) = pending.pop() {
        match effect {
            Effect::CreateSubject { name, color } => {
                let response = send(
                    &app,
                    post_json(
                        "/subjects",
                        Some(token.as_str()),
                        json!({ "name": name, "color": color.hex() }),
                    ),
                )
                .await;
                let body = json_body(response).await;
                let event = if body["success"] == true {
                    let id = Uuid::parse_str(body["subject"]["id"].as_str().unwrap()).unwrap();
                    SelectEvent::CreateSucceeded(Subject {
                        id,
                        user_id,
                        name: name.clone(),
                        color,
                    })
                } else {
                    SelectEvent::CreateFailed(body.to_string())
                };
                let mut next = picker.handle(event);
                next.reverse();
                pending.extend(next);
            }
            Effect::Refresh => {
                refreshes += 1;
                let body = json_body(send(&app, get("/subjects", Some(token.as_str()))).await).await;
                subjects = body
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|s| Subject {
                        id: Uuid::parse_str(s["id"].as_str().unwrap()).unwrap(),
                        user_id,
                        name: s["name"].as_str().unwrap().to_string(),
                        color: SubjectColor::from_hex(s["color"].as_str().unwrap()).unwrap(),
                    })
                    .collect();
            }
            Effect::Select(value) => selections.push(value),
        }
    }

    assert_eq!(refreshes, 1);
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0], picker.value());
    assert_eq!(picker.state(), SelectState::Closed);
    assert_eq!(picker.trigger_label(&subjects), "Biology");
}
