// src/services/dashboard.rs

use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        attempt::Attempt,
        dashboard::{
            AdminDashboard, AdminExamSummary, AttemptStatus, StudentDashboard,
            StudentExamSummary,
        },
        user::{Caller, UserSummary},
    },
    repositories::{AttemptLedger, ExamRepository},
};

/// Read-only summaries over exams and attempts.
#[derive(Clone)]
pub struct DashboardAggregator {
    exams: Arc<dyn ExamRepository>,
    attempts: Arc<dyn AttemptLedger>,
}

impl DashboardAggregator {
    pub fn new(exams: Arc<dyn ExamRepository>, attempts: Arc<dyn AttemptLedger>) -> Self {
        Self { exams, attempts }
    }

    /// Attendance and average score for every exam the admin owns.
    /// In-progress attempts count toward both figures.
    pub async fn admin_dashboard(&self, caller: &Caller) -> Result<AdminDashboard, AppError> {
        let admin = caller.require_admin()?;
        let exams = self.exams.find_by_owner(admin.id).await?;

        let mut dashboard = Vec::with_capacity(exams.len());
        for exam in exams {
            let attempts = self.attempts.find_by_exam(exam.id).await?;
            dashboard.push(AdminExamSummary {
                exam_id: exam.id,
                name: exam.name,
                total_questions: exam.quiz_list.len(),
                total_attended: attempts.len(),
                average_score: average_score(&attempts),
            });
        }

        Ok(AdminDashboard {
            admin: UserSummary::from(admin),
            dashboard,
        })
    }

    /// Every exam the student has started, with its status.
    pub async fn student_dashboard(&self, caller: &Caller) -> Result<StudentDashboard, AppError> {
        let student = caller.require_student()?;
        let attempts = self.attempts.find_by_student(student.id).await?;

        let mut dashboard = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            // Attempts may reference an exam that no longer resolves; skip them.
            let Some(exam) = self.exams.find_by_id(attempt.exam_id).await? else {
                tracing::warn!(attempt_id = %attempt.id, exam_id = %attempt.exam_id, "Attempt references unknown exam");
                continue;
            };

            let (status, score) = if attempt.is_submitted() {
                (AttemptStatus::Submitted, Some(attempt.score))
            } else {
                (AttemptStatus::InProgress, None)
            };

            dashboard.push(StudentExamSummary {
                exam_id: exam.id,
                name: exam.name,
                total_questions: exam.quiz_list.len(),
                status,
                score,
                submitted_at: attempt.submitted_at,
            });
        }

        Ok(StudentDashboard {
            student: UserSummary::from(student),
            dashboard,
        })
    }
}

/// Arithmetic mean of attempt scores with two decimals; "0.00" for none.
fn average_score(attempts: &[Attempt]) -> String {
    if attempts.is_empty() {
        return format!("{:.2}", 0.0);
    }
    let total: i64 = attempts.iter().map(|a| i64::from(a.score)).sum();
    format!("{:.2}", total as f64 / attempts.len() as f64)
}
