//! Data service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("members cannot remove themselves")]
    SelfRemoval,

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True if the failure means the targeted record does not exist.
    ///
    /// A missing organization is not included: the whole scope is gone, not
    /// just the record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MemberNotFound(_))
    }
}
