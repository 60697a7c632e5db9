// src/models/user.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// The two account kinds. Students and admins live in separate namespaces,
/// so the same email may exist once per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn from_is_student(is_student: bool) -> Self {
        if is_student { Role::Student } else { Role::Admin }
    }

    pub fn is_student(self) -> bool {
        self == Role::Student
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student or admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for the identity store. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Public account summary, shown in dashboards and login responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// DTO for creating a new account (Signup).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100, message = "Invalid name"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be at least 8 characters"
    ))]
    pub password: String,
    pub is_student: bool,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    pub is_student: bool,
}

/// The authenticated caller, resolved once per request.
/// Operations pick the variant they require instead of branching on a flag.
#[derive(Debug, Clone)]
pub enum Caller {
    Student(User),
    Admin(User),
}

impl Caller {
    pub fn from_user(user: User) -> Self {
        match user.role {
            Role::Student => Caller::Student(user),
            Role::Admin => Caller::Admin(user),
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Caller::Student(user) | Caller::Admin(user) => user,
        }
    }

    pub fn require_student(&self) -> Result<&User, AppError> {
        match self {
            Caller::Student(user) => Ok(user),
            Caller::Admin(_) => Err(AppError::Forbidden("Students only".to_string())),
        }
    }

    pub fn require_admin(&self) -> Result<&User, AppError> {
        match self {
            Caller::Admin(user) => Ok(user),
            Caller::Student(_) => Err(AppError::Forbidden("Admin only".to_string())),
        }
    }
}
