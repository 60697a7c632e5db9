// src/services/exam_engine.rs

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptView, SubmitResult, SubmittedAnswer, Submission},
        exam::{CreateExamRequest, ExamView, NewExam, OptionKey, Question, QuestionInput},
        user::Caller,
    },
    repositories::{AttemptLedger, ExamRepository, StoreError},
    utils::html::clean_field,
};

const MISSING_FIELDS: &str = "Missing required fields: exam name and a non-empty quizList";
const INCOMPLETE_QUESTION: &str = "Each question must have a numeric sno (>=1) and complete data";

/// Exam lifecycle: creation, start, redacted viewing, submission and scoring.
///
/// Stateless per request. Uniqueness of attempts and the once-only submission
/// write are delegated to the [`AttemptLedger`].
#[derive(Clone)]
pub struct ExamEngine {
    exams: Arc<dyn ExamRepository>,
    attempts: Arc<dyn AttemptLedger>,
}

impl ExamEngine {
    pub fn new(exams: Arc<dyn ExamRepository>, attempts: Arc<dyn AttemptLedger>) -> Self {
        Self { exams, attempts }
    }

    /// Validates and stores a new exam owned by the calling admin.
    pub async fn create_exam(
        &self,
        caller: &Caller,
        req: CreateExamRequest,
    ) -> Result<Uuid, AppError> {
        let admin = caller.require_admin()?;
        let (name, quiz_list) = validate_exam(req)?;
        let question_count = quiz_list.len();

        let exam_id = self
            .exams
            .insert(NewExam {
                name,
                quiz_list,
                created_by: admin.id,
            })
            .await?;

        tracing::info!(%exam_id, admin = %admin.email, question_count, "Exam created");
        Ok(exam_id)
    }

    /// Opens the caller's single attempt at an exam.
    pub async fn start_attempt(&self, caller: &Caller, exam_id: Uuid) -> Result<Uuid, AppError> {
        let student = caller.require_student()?;

        match self.attempts.insert_if_absent(exam_id, student.id).await {
            Ok(attempt_id) => {
                tracing::info!(%exam_id, %attempt_id, student = %student.email, "Attempt started");
                Ok(attempt_id)
            }
            Err(StoreError::AlreadyExists) => {
                tracing::warn!(%exam_id, student = %student.email, "Attempt already started");
                Err(AppError::AlreadyStarted)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the exam without answer keys.
    /// Students who already submitted are locked out.
    pub async fn get_exam_for_taking(
        &self,
        caller: &Caller,
        exam_id: Uuid,
    ) -> Result<ExamView, AppError> {
        if let Caller::Student(student) = caller {
            let attempt = self.attempts.find_one(exam_id, student.id).await?;
            if attempt.is_some_and(|a| a.is_submitted()) {
                return Err(AppError::Forbidden(
                    "Exam already submitted. Access denied.".to_string(),
                ));
            }
        }

        let exam = self
            .exams
            .find_by_id(exam_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

        Ok(ExamView::from(&exam))
    }

    /// Scores and finalizes the caller's attempt. Never re-scores.
    pub async fn submit_attempt(
        &self,
        caller: &Caller,
        attempt_id: Uuid,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<SubmitResult, AppError> {
        let student = caller.require_student()?;

        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .filter(|a| a.student_id == student.id)
            .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

        if attempt.is_submitted() {
            return Err(AppError::AlreadySubmitted);
        }

        let exam = self
            .exams
            .find_by_id(attempt.exam_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

        let score = score_answers(&exam.quiz_list, &answers);

        // The ledger re-checks "not yet submitted" inside the same write, so a
        // concurrent submission that passed the check above still loses here.
        self.attempts
            .update_once(
                attempt.id,
                Submission {
                    answers,
                    score,
                    submitted_at: Utc::now(),
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::AlreadySubmitted => {
                    tracing::warn!(%attempt_id, "Concurrent submission rejected");
                    AppError::AlreadySubmitted
                }
                other => other.into(),
            })?;

        tracing::info!(%attempt_id, exam_id = %exam.id, score, "Attempt submitted");
        Ok(SubmitResult {
            score,
            total_questions: exam.quiz_list.len(),
        })
    }

    /// The caller's own attempt for an exam, for resuming after a reload.
    pub async fn get_attempt_status(
        &self,
        caller: &Caller,
        exam_id: Uuid,
    ) -> Result<AttemptView, AppError> {
        let student = caller.require_student()?;

        let attempt = self
            .attempts
            .find_one(exam_id, student.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

        Ok(AttemptView::from(attempt))
    }
}

/// Checks the exam payload and produces the cleaned name and question list.
///
/// Rules, in order: name and list present, then per question complete data,
/// then distinct sequence numbers.
fn validate_exam(req: CreateExamRequest) -> Result<(String, Vec<Question>), AppError> {
    let name = clean_field(&req.name);
    if name.is_empty() || req.quiz_list.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    }

    let mut seen = HashSet::with_capacity(req.quiz_list.len());
    let mut quiz_list = Vec::with_capacity(req.quiz_list.len());

    for input in &req.quiz_list {
        let question = validate_question(input)
            .ok_or_else(|| AppError::Validation(INCOMPLETE_QUESTION.to_string()))?;

        if !seen.insert(question.sno) {
            return Err(AppError::Validation(format!(
                "Duplicate question sno found: {}",
                question.sno
            )));
        }
        quiz_list.push(question);
    }

    Ok((name, quiz_list))
}

fn validate_question(input: &QuestionInput) -> Option<Question> {
    let sno = input.sno.filter(|n| *n >= 1)?;
    let correct_option = OptionKey::parse(&input.correct_option)?;

    let question = Question {
        sno,
        question: clean_field(&input.question),
        option_a: clean_field(&input.option_a),
        option_b: clean_field(&input.option_b),
        option_c: clean_field(&input.option_c),
        option_d: clean_field(&input.option_d),
        correct_option,
    };

    let texts = [
        &question.question,
        &question.option_a,
        &question.option_b,
        &question.option_c,
        &question.option_d,
    ];
    if texts.iter().any(|t| t.is_empty()) {
        return None;
    }
    Some(question)
}

/// One point per question whose first matching answer (by question text)
/// selects the correct option.
///
/// Answers are matched on text, not on a per-question id, so questions that
/// share identical text are all judged against the same submitted answer.
pub fn score_answers(questions: &[Question], answers: &[SubmittedAnswer]) -> i32 {
    questions
        .iter()
        .filter(|q| {
            answers
                .iter()
                .find(|a| a.question == q.question)
                .is_some_and(|a| {
                    a.selected_option.as_deref() == Some(q.correct_option.as_str())
                })
        })
        .count() as i32
}
