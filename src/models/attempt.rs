// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submitted answer, matched to a question by its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[serde(default)]
    pub question: String,
    /// Free-form so that an out-of-range letter simply scores nothing.
    /// `None` (or an explicit `null`) is a skipped question.
    #[serde(default)]
    pub selected_option: Option<String>,
}

/// Represents the 'exam_attempts' table in the database.
/// A student's single run at an exam: in-progress until `submitted_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub answers: Vec<SubmittedAnswer>,
    pub score: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Attempt {
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// The single write that finalizes an attempt.
#[derive(Debug, Clone)]
pub struct Submission {
    pub answers: Vec<SubmittedAnswer>,
    pub score: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting an attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptResponse {
    pub message: &'static str,
    pub attempt_id: Uuid,
}

/// Outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub score: i32,
    pub total_questions: usize,
}

/// The caller's own attempt, used to resume after a reload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub attempt_id: Uuid,
    pub score: i32,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub answers: Vec<SubmittedAnswer>,
}

impl From<Attempt> for AttemptView {
    fn from(attempt: Attempt) -> Self {
        Self {
            attempt_id: attempt.id,
            score: attempt.score,
            submitted_at: attempt.submitted_at,
            answers: attempt.answers,
        }
    }
}
