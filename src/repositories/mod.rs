// src/repositories/mod.rs

//! Storage seams.
//!
//! The engine only talks to these traits. Two constraints carry all of the
//! concurrency correctness and must be enforced by every implementation:
//!
//! * `AttemptLedger::insert_if_absent` is backed by a uniqueness constraint on
//!   `(exam, student)`; a second insert for the same pair yields
//!   [`StoreError::AlreadyExists`].
//! * `AttemptLedger::update_once` only applies while the attempt is unsubmitted;
//!   otherwise it yields [`StoreError::AlreadySubmitted`] and writes nothing.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    attempt::{Attempt, Submission},
    exam::{Exam, NewExam},
    user::{NewUser, Role, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the insert.
    #[error("record already exists")]
    AlreadyExists,

    /// The conditional submission write found the attempt already finalized.
    #[error("attempt already submitted")]
    AlreadySubmitted,

    /// The record targeted by an update does not exist.
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Student and admin accounts.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str, role: Role) -> StoreResult<Option<User>>;

    /// Fails with `AlreadyExists` when the email is taken for that role.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

/// Exam definitions, including answer keys.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    async fn insert(&self, exam: NewExam) -> StoreResult<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Exam>>;

    /// Exams owned by an admin, oldest first.
    async fn find_by_owner(&self, admin_id: Uuid) -> StoreResult<Vec<Exam>>;
}

/// One attempt per (exam, student).
#[async_trait]
pub trait AttemptLedger: Send + Sync {
    /// Creates an in-progress attempt with score 0 and no answers.
    async fn insert_if_absent(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Uuid>;

    async fn find_one(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Option<Attempt>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Attempt>>;

    /// Sets answers, score and submission time in one conditional write.
    async fn update_once(&self, id: Uuid, submission: Submission) -> StoreResult<()>;

    async fn find_by_exam(&self, exam_id: Uuid) -> StoreResult<Vec<Attempt>>;

    /// Attempts of a student, oldest first.
    async fn find_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Attempt>>;
}
