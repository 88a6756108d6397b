use std::collections::BTreeMap;

use academy_validation::ValidationErrors;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not found")]
    NotFound,

    #[error("{message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Record could not be decoded: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("The form is not ready")]
    NotReady,
}

impl ClientError {
    /// The HTTP status behind the error, if the server responded.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::NotFound => Some(StatusCode::NOT_FOUND),
            ClientError::Request(e) => e.status(),
            _ => None,
        }
    }

    /// The error kind reported by the server, or a local kind.
    pub fn kind(&self) -> &str {
        match self {
            ClientError::Api { kind, .. } => kind,
            ClientError::NotFound => "not_found",
            ClientError::Request(_) => "request",
            ClientError::Validation(_) => "validation",
            ClientError::InvalidRecord(_) => "invalid_record",
            ClientError::SubmitInProgress => "submit_in_progress",
            ClientError::NotReady => "not_ready",
        }
    }

    /// Per-field messages, from local validation or from the server's response.
    pub fn field_errors(&self) -> Option<ValidationErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors.clone()),
            ClientError::Api { fields, .. } if !fields.is_empty() => {
                Some(ValidationErrors::from(fields.clone()))
            }
            _ => None,
        }
    }
}
