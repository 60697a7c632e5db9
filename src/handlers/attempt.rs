// src/handlers/attempt.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::parse_id,
    models::{
        attempt::{StartAttemptResponse, SubmitAttemptRequest},
        user::Caller,
    },
    services::ExamEngine,
};

/// Starts the caller's single attempt at an exam.
/// Student only.
pub async fn start_attempt(
    State(engine): State<ExamEngine>,
    caller: Caller,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam_id = parse_id(&exam_id, "examId")?;
    let attempt_id = engine.start_attempt(&caller, exam_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(StartAttemptResponse {
            message: "Exam started",
            attempt_id,
        }),
    ))
}

/// Returns the caller's attempt for an exam, to resume after a reload.
pub async fn get_attempt(
    State(engine): State<ExamEngine>,
    caller: Caller,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam_id = parse_id(&exam_id, "examId")?;
    let view = engine.get_attempt_status(&caller, exam_id).await?;
    Ok(Json(view))
}

/// Submits answers and returns the score. A second submission is rejected.
pub async fn submit_attempt(
    State(engine): State<ExamEngine>,
    caller: Caller,
    Path(attempt_id): Path<String>,
    payload: Result<Json<SubmitAttemptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let attempt_id = parse_id(&attempt_id, "attemptId")?;
    let Json(req) = payload?;
    let result = engine.submit_attempt(&caller, attempt_id, req.answers).await?;

    Ok(Json(json!({
        "message": "Exam submitted",
        "score": result.score,
        "totalQuestions": result.total_questions,
    })))
}
