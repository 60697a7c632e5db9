// tests/router_tests.rs

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use quiz_backend::{
    config::Config,
    models::user::{NewUser, Role},
    repositories::{IdentityStore, MemoryStore},
    routes,
    state::AppState,
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "router_test_secret";

/// Builds the router over a store the test can seed directly.
fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), Config::for_secret(SECRET));
    (routes::create_router(state), store)
}

async fn token_for(store: &MemoryStore, email: &str, role: Role) -> String {
    let user = store
        .insert(NewUser {
            name: "Seeded".to_string(),
            email: email.to_string(),
            password: "unused".to_string(),
            role,
        })
        .await
        .unwrap();
    sign_jwt(&user, SECRET, 600).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let (app, store) = app();
    let admin = token_for(&store, "admin@example.com", Role::Admin).await;

    let (status, body) = send(&app, post_json("/api/exams", &admin, "{ not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Request body is not valid JSON");
}

#[tokio::test]
async fn mistyped_json_gets_a_stable_message() {
    let (app, store) = app();
    let student = token_for(&store, "student@example.com", Role::Student).await;

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/attempts/{}/submit", uuid::Uuid::new_v4()),
            &student,
            r#"{"answers": "A,B"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body has missing or mistyped fields");
    assert!(!body["error"].as_str().unwrap().contains("line 1"));
}

#[tokio::test]
async fn token_for_unknown_account_is_unauthorized() {
    // Signed for an account that only exists in another store.
    let (_, other_store) = app();
    let token = token_for(&other_store, "ghost@example.com", Role::Student).await;

    let (router, _) = app();
    let (status, body) = send(&router, get("/api/dashboard/student", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn roles_are_enforced_per_operation() {
    let (app, store) = app();
    let admin = token_for(&store, "admin@example.com", Role::Admin).await;
    let student = token_for(&store, "student@example.com", Role::Student).await;
    let exam_id = uuid::Uuid::new_v4();

    let (status, _) = send(&app, get("/api/dashboard/admin", &student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, get("/api/dashboard/student", &admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        post_json(&format!("/api/exams/{}/start", exam_id), &admin, ""),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(&app, get(&format!("/api/exams/{}/attempt", exam_id), &admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_dashboard_average_is_zero_without_attempts() {
    let (app, store) = app();
    let admin = token_for(&store, "admin@example.com", Role::Admin).await;

    let exam = json!({
        "name": "Lonely",
        "quizList": [{
            "sno": 1,
            "question": "Anyone?",
            "optionA": "Yes",
            "optionB": "No",
            "optionC": "Maybe",
            "optionD": "Later",
            "correctOption": "D"
        }]
    });
    let (status, _) = send(&app, post_json("/api/exams", &admin, &exam.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/dashboard/admin", &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["email"], "admin@example.com");
    let row = &body["dashboard"][0];
    assert_eq!(row["name"], "Lonely");
    assert_eq!(row["totalQuestions"], 1);
    assert_eq!(row["totalAttended"], 0);
    assert_eq!(row["averageScore"], "0.00");
}

#[tokio::test]
async fn submit_unknown_attempt_is_not_found() {
    let (app, store) = app();
    let student = token_for(&store, "student@example.com", Role::Student).await;

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/attempts/{}/submit", uuid::Uuid::new_v4()),
            &student,
            r#"{"answers": []}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn start_exam_with_body_less_post() {
    let (app, store) = app();
    let student = token_for(&store, "student@example.com", Role::Student).await;
    let exam_id = uuid::Uuid::new_v4();

    // Starting does not re-validate the exam; only the pairing is constrained.
    let (status, body) = send(
        &app,
        post_json(&format!("/api/exams/{}/start", exam_id), &student, ""),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["attemptId"].is_string());
    assert_eq!(store.attempt_count().await, 1);
}

#[tokio::test]
async fn skipped_answers_are_submitted_as_null() {
    let (app, store) = app();
    let admin = token_for(&store, "admin@example.com", Role::Admin).await;
    let student = token_for(&store, "student@example.com", Role::Student).await;

    let exam = json!({
        "name": "Symbols",
        "quizList": [
            {
                "sno": 1,
                "question": "Is 3 > 2 & 1 < 2?",
                "optionA": "Yes",
                "optionB": "No",
                "optionC": "x < y",
                "optionD": "a & b",
                "correctOption": "A"
            },
            {
                "sno": 2,
                "question": "Q2",
                "optionA": "a",
                "optionB": "b",
                "optionC": "c",
                "optionD": "d",
                "correctOption": "B"
            }
        ]
    });
    let (status, body) = send(&app, post_json("/api/exams", &admin, &exam.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    let exam_id = body["examId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(&format!("/api/exams/{}/start", exam_id), &student, ""),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let attempt_id = body["attemptId"].as_str().unwrap().to_string();

    let (status, view) = send(&app, get(&format!("/api/exams/{}", exam_id), &student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["quizList"][0]["question"], "Is 3 > 2 & 1 < 2?");
    assert_eq!(view["quizList"][0]["optionC"], "x < y");
    assert_eq!(view["quizList"][0]["optionD"], "a & b");

    let answers = json!({
        "answers": [
            { "question": "Is 3 > 2 & 1 < 2?", "selectedOption": "A" },
            { "question": "Q2", "selectedOption": null }
        ]
    });
    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/attempts/{}/submit", attempt_id),
            &student,
            &answers.to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 1);
    assert_eq!(body["totalQuestions"], 2);

    let (status, body) = send(&app, get(&format!("/api/exams/{}/attempt", exam_id), &student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answers"][1]["selectedOption"], Value::Null);
}
