use academy_auth::AccessRequest;
use academy_http_errors::ErrorResponseData;
use academy_validation::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database Error: {0}")]
    DbErr(diesel::result::Error),

    #[error("Database Pool Error: {0}")]
    DbPool(#[from] deadpool_diesel::PoolError),

    #[error("Database interaction was aborted")]
    DbInteractAborted,

    #[error("Server error: {0}")]
    ServerError(#[from] hyper::Error),

    #[error("Missing Permission {0}")]
    MissingPermission(AccessRequest),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Auth error: {0}")]
    AuthError(#[from] academy_auth::Error),

    #[error("API Key Not Found")]
    ApiKeyNotFound,

    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Referenced record does not exist")]
    InvalidReference(Option<String>),

    #[error("{0} has dependent records")]
    HasDependents(&'static str),

    #[error("Unknown relation `{1}` for {0}")]
    InvalidRelation(&'static str, String),

    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}

impl Error {
    fn error_kind(&self) -> &'static str {
        match self {
            Error::DbErr(_) => "db",
            Error::DbPool(_) => "db_pool",
            Error::DbInteractAborted => "db",
            Error::ServerError(_) => "internal_server_error",
            Error::MissingPermission(_) => "missing_permission",
            Error::Unauthenticated => "authn",
            Error::AuthError(_) => "authn",
            Error::ApiKeyNotFound => "authn",
            Error::NotFound => "not_found",
            Error::Validation(_) => "validation",
            Error::InvalidReference(_) => "invalid_reference",
            Error::HasDependents(_) => "has_dependents",
            Error::InvalidRelation(..) => "invalid_relation",
            Error::Generic(_) => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingPermission(_) => StatusCode::FORBIDDEN,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::AuthError(_) => StatusCode::UNAUTHORIZED,
            Error::ApiKeyNotFound => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::HasDependents(_) => StatusCode::CONFLICT,
            Error::InvalidRelation(..) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn response_tuple(&self) -> (StatusCode, ErrorResponseData) {
        let data = ErrorResponseData::new(self.error_kind(), self.to_string());
        let data = match self {
            Error::Validation(errors) => data.with_fields(errors.clone().into_inner()),
            _ => data,
        };

        (self.status_code(), data)
    }

    /// A foreign key violation while deleting means other records still point
    /// at the one being deleted.
    pub fn on_delete(self, entity: &'static str) -> Error {
        match self {
            Error::InvalidReference(_) => Error::HasDependents(entity),
            e => e,
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => Error::NotFound,
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Error::InvalidReference(info.constraint_name().map(String::from))
            }
            e => Error::DbErr(e),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(e: ValidationErrors) -> Self {
        Error::Validation(e)
    }
}

impl From<deadpool_diesel::InteractError> for Error {
    fn from(e: deadpool_diesel::InteractError) -> Self {
        match e {
            deadpool_diesel::InteractError::Panic(p) => std::panic::resume_unwind(p),
            deadpool_diesel::InteractError::Aborted => Error::DbInteractAborted,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (code, json) = self.response_tuple();
        (code, Json(json)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use academy_auth::AccessOperation;

    use super::*;

    #[test]
    fn validation_errors_carry_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("goals".to_string(), "goals must be an integer".to_string());
        let (status, data) = Error::Validation(fields.into()).response_tuple();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(data.error.kind, "validation");
        assert_eq!(
            data.error.fields.unwrap().get("goals").map(String::as_str),
            Some("goals must be an integer")
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::MissingPermission(AccessRequest::project("team", AccessOperation::Read))
                .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::InvalidReference(None).on_delete("team").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::from(diesel::result::Error::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
