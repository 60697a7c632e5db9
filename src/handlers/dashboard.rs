// src/handlers/dashboard.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, models::user::Caller, services::DashboardAggregator};

/// Per-exam attendance and average score for the calling admin.
pub async fn admin_dashboard(
    State(dashboards): State<DashboardAggregator>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(dashboards.admin_dashboard(&caller).await?))
}

/// Started exams and their status for the calling student.
pub async fn student_dashboard(
    State(dashboards): State<DashboardAggregator>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(dashboards.student_dashboard(&caller).await?))
}
