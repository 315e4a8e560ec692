use thiserror::Error;

use crate::access::AccessError;
use crate::backend::BackendError;
use crate::types::{OrgId, ValidationError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no active organization")]
    NoActiveOrganization,

    #[error("unknown organization: {0}")]
    UnknownOrganization(OrgId),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("forbidden: {0}")]
    Forbidden(#[from] AccessError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type StoreResult<T> = Result<T, StoreError>;
