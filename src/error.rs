use axum::{http::StatusCode, Json};
use thiserror::Error;

use crate::logic::validate::ValidationError;
use crate::model::{ErrorResponse, Role};

/// Recoverable failures of catalog and ledger operations. None of these are
/// fatal to the process.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{actor} ({role}) is not allowed to {action}")]
    Authorization {
        actor: String,
        role: Role,
        action: &'static str,
    },

    #[error("Ledger for patent '{0}' is not in edit mode")]
    NotEditing(String),

    #[error("Funding for patent '{patent_id}' is already being edited by {holder}")]
    SessionLocked { patent_id: String, holder: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Authorization { .. } => StatusCode::FORBIDDEN,
            CatalogError::NotEditing(_) | CatalogError::SessionLocked { .. } => {
                StatusCode::CONFLICT
            }
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: CatalogError) -> Self {
        (err.status_code(), Json(ErrorResponse::new(&err.to_string())))
    }
}
