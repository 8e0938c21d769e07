use models::{errors::ModelError, EntityKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ModelError),
    #[error("no {0} entity with the requested id")]
    NotFound(EntityKind),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    pub fn store(e: impl std::fmt::Display) -> Self { Self::Store(e.to_string()) }
}
