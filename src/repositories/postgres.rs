// src/repositories/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use super::{AttemptLedger, ExamRepository, IdentityStore, StoreError, StoreResult};
use crate::models::{
    attempt::{Attempt, SubmittedAnswer, Submission},
    exam::{Exam, NewExam, Question},
    user::{NewUser, Role, User},
};

const EXAM_COLUMNS: &str = "id, name, quiz_list, created_by, created_at, updated_at";
const ATTEMPT_COLUMNS: &str = "id, exam_id, student_id, answers, score, created_at, submitted_at";

/// PostgreSQL-backed store. Questions and answers are JSONB documents on
/// their parent rows, so every write below is a single-row statement.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Maps unique violations to `AlreadyExists`, everything else to `Database`.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::AlreadyExists,
        _ => StoreError::Database(err),
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, role: Role) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password: self.password,
            role,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ExamRow {
    id: Uuid,
    name: String,
    quiz_list: Json<Vec<Question>>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExamRow> for Exam {
    fn from(row: ExamRow) -> Self {
        Exam {
            id: row.id,
            name: row.name,
            quiz_list: row.quiz_list.0,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AttemptRow {
    id: Uuid,
    exam_id: Uuid,
    student_id: Uuid,
    answers: Json<Vec<SubmittedAnswer>>,
    score: i32,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl From<AttemptRow> for Attempt {
    fn from(row: AttemptRow) -> Self {
        Attempt {
            id: row.id,
            exam_id: row.exam_id,
            student_id: row.student_id,
            answers: row.answers.0,
            score: row.score,
            created_at: row.created_at,
            submitted_at: row.submitted_at,
        }
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_by_email(&self, email: &str, role: Role) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, created_at FROM users WHERE email = $1 AND role = $2",
        )
        .bind(email)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user(role)))
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(row.into_user(user.role))
    }
}

#[async_trait]
impl ExamRepository for PgStore {
    async fn insert(&self, exam: NewExam) -> StoreResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO exams (id, name, quiz_list, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&exam.name)
        .bind(Json(&exam.quiz_list))
        .bind(exam.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Exam>> {
        let row = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Exam::from))
    }

    async fn find_by_owner(&self, admin_id: Uuid) -> StoreResult<Vec<Exam>> {
        let rows = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE created_by = $1 ORDER BY created_at ASC"
        ))
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Exam::from).collect())
    }
}

#[async_trait]
impl AttemptLedger for PgStore {
    async fn insert_if_absent(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Uuid> {
        // No pre-check: the (exam_id, student_id) unique index decides.
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO exam_attempts (id, exam_id, student_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(exam_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    async fn find_one(&self, exam_id: Uuid, student_id: Uuid) -> StoreResult<Option<Attempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM exam_attempts WHERE exam_id = $1 AND student_id = $2"
        ))
        .bind(exam_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Attempt::from))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Attempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM exam_attempts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Attempt::from))
    }

    async fn update_once(&self, id: Uuid, submission: Submission) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE exam_attempts
            SET answers = $2, score = $3, submitted_at = $4, updated_at = NOW()
            WHERE id = $1 AND submitted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(Json(&submission.answers))
        .bind(submission.score)
        .bind(submission.submitted_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM exam_attempts WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            Err(StoreError::AlreadySubmitted)
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> StoreResult<Vec<Attempt>> {
        let rows = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM exam_attempts WHERE exam_id = $1 ORDER BY created_at ASC"
        ))
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Attempt::from).collect())
    }

    async fn find_by_student(&self, student_id: Uuid) -> StoreResult<Vec<Attempt>> {
        let rows = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM exam_attempts WHERE student_id = $1 ORDER BY created_at ASC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Attempt::from).collect())
    }
}

/// These run against a real database: `DATABASE_URL=... cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PgStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    async fn student(store: &PgStore) -> User {
        IdentityStore::insert(
            store,
            NewUser {
                name: "Pg Student".to_string(),
                email: format!("pg_{}@example.com", Uuid::new_v4()),
                password: "hash".to_string(),
                role: Role::Student,
            },
        )
        .await
        .unwrap()
    }

    fn submission(score: i32) -> Submission {
        Submission {
            answers: vec![SubmittedAnswer {
                question: "q".to_string(),
                selected_option: None,
            }],
            score,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn duplicate_email_per_role_is_already_exists() {
        let store = store().await;
        let user = student(&store).await;

        let err = IdentityStore::insert(
            &store,
            NewUser {
                name: "Again".to_string(),
                email: user.email.clone(),
                password: "hash".to_string(),
                role: Role::Student,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn attempt_pair_violation_is_already_exists() {
        let store = store().await;
        let user = student(&store).await;
        let exam_id = Uuid::new_v4();

        store.insert_if_absent(exam_id, user.id).await.unwrap();
        let err = store.insert_if_absent(exam_id, user.id).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn update_once_only_writes_in_progress_attempts() {
        let store = store().await;
        let user = student(&store).await;
        let id = store.insert_if_absent(Uuid::new_v4(), user.id).await.unwrap();

        store.update_once(id, submission(3)).await.unwrap();
        let err = store.update_once(id, submission(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadySubmitted));

        let attempt = AttemptLedger::find_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(attempt.score, 3);
        assert_eq!(attempt.answers[0].selected_option, None);
        assert!(attempt.is_submitted());

        let err = store
            .update_once(Uuid::new_v4(), submission(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
