// src/repositories/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AttemptLedger, ExamRepository, IdentityStore, StoreError, StoreResult};
use crate::models::{
    attempt::{Attempt, Submission},
    exam::{Exam, NewExam},
    user::{NewUser, Role, User},
};

/// In-process store with the same constraints as the Postgres schema.
/// Each check-and-write happens under a single write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    exams: RwLock<Vec<Exam>>,
    attempts: RwLock<Vec<Attempt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored attempts, across all exams.
    pub async fn attempt_count(&self) -> usize {
        self.attempts.read().await.len()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_by_email(&self, email: &str, role: Role) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.role == role && u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.role == user.role && u.email == user.email)
        {
            return Err(StoreError::AlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ExamRepository for MemoryStore {
    async fn insert(&self, exam: NewExam) -> StoreResult<Uuid> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        self.exams.write().await.push(Exam {
            id,
            name: exam.name,
            quiz_list: exam.quiz_list,
            created_by: exam.created_by,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Exam>> {
        let exams = self.exams.read().await;
        Ok(exams.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_owner(&self, admin_id: Uuid) -> StoreResult<Vec<Exam>> {
        let exams = self.exams.read().await;
        Ok(exams
            .iter()
            .filter(|e| e.created_by == admin_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttemptLedger for MemoryStore {
    async fn insert_if_absent(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Uuid> {
        let mut attempts = self.attempts.write().await;
        if attempts
            .iter()
            .any(|a| a.exam_id == exam_id && a.student_id == student_id)
        {
            return Err(StoreError::AlreadyExists);
        }

        let id = Uuid::new_v4();
        attempts.push(Attempt {
            id,
            exam_id,
            student_id,
            answers: Vec::new(),
            score: 0,
            created_at: Utc::now(),
            submitted_at: None,
        });
        Ok(id)
    }

    async fn find_one(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .find(|a| a.exam_id == exam_id && a.student_id == student_id)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.iter().find(|a| a.id == id).cloned())
    }

    async fn update_once(&self, id: Uuid, submission: Submission) -> StoreResult<()> {
        let mut attempts = self.attempts.write().await;
        let attempt = attempts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;

        if attempt.is_submitted() {
            return Err(StoreError::AlreadySubmitted);
        }

        attempt.answers = submission.answers;
        attempt.score = submission.score;
        attempt.submitted_at = Some(submission.submitted_at);
        Ok(())
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> StoreResult<Vec<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }
}
