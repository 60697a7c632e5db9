// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::parse_id,
    models::{
        exam::{CreateExamRequest, CreateExamResponse},
        user::Caller,
    },
    services::ExamEngine,
};

/// Creates an exam with its full question list.
/// Admin only.
pub async fn create_exam(
    State(engine): State<ExamEngine>,
    caller: Caller,
    payload: Result<Json<CreateExamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let exam_id = engine.create_exam(&caller, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateExamResponse {
            message: "Exam created",
            exam_id,
        }),
    ))
}

/// Fetches an exam for taking, with answer keys removed.
pub async fn get_exam(
    State(engine): State<ExamEngine>,
    caller: Caller,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam_id = parse_id(&exam_id, "examId")?;
    let view = engine.get_exam_for_taking(&caller, exam_id).await?;
    Ok(Json(view))
}
