// src/models/dashboard.rs

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::UserSummary;

/// Per-exam statistics for the owning admin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminExamSummary {
    pub exam_id: Uuid,
    pub name: String,
    pub total_questions: usize,
    /// Every attempt, submitted or not.
    pub total_attended: usize,
    /// Mean score rendered with two decimals, "0.00" when nobody attended.
    pub average_score: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

/// One started exam as seen by the student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentExamSummary {
    pub exam_id: Uuid,
    pub name: String,
    pub total_questions: usize,
    pub status: AttemptStatus,
    pub score: Option<i32>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub admin: UserSummary,
    pub dashboard: Vec<AdminExamSummary>,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub student: UserSummary,
    pub dashboard: Vec<StudentExamSummary>,
}
