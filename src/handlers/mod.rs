// src/handlers/mod.rs

use uuid::Uuid;

use crate::error::AppError;

pub mod attempt;
pub mod auth;
pub mod dashboard;
pub mod exam;
pub mod health;

/// Parses an id path segment, naming the field in the validation error.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_names_the_field() {
        let err = parse_id("not-a-uuid", "examId").unwrap_err();
        assert_eq!(err.to_string(), "Invalid examId");

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "examId").unwrap(), id);
    }
}
