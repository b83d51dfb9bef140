use crate::types::DbId;

/// Domain failure raised by validation and business rules.
///
/// Each variant maps to one HTTP status in the API crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `entity` names the table's singular noun, e.g. `"Quest"`.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the role, e.g. party owner.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
