//! Domain errors shared by the user and task services.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("invalid task status '{0}' (expected one of: todo, in_progress, done)")]
    InvalidStatus(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ServiceError::not_found("user", 42);
        assert_eq!(err.to_string(), "user 42 not found");
    }

    #[test]
    fn invalid_status_message_lists_vocabulary() {
        let err = ServiceError::InvalidStatus("blocked".into());
        assert!(err.to_string().contains("todo, in_progress, done"));
    }
}
