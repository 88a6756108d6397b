use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::BTreeMap};
use tracing::{event, Level};

/// The JSON body returned with every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseData {
    pub error: ErrorDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub kind: Cow<'static, str>,
    pub message: Cow<'static, str>,
    /// Per-field messages when the request body failed validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ErrorResponseData {
    pub fn new(
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> ErrorResponseData {
        let ret = ErrorResponseData {
            error: ErrorDetails {
                kind: kind.into(),
                message: message.into(),
                fields: None,
            },
        };

        event!(Level::ERROR, kind=%ret.error.kind, message=%ret.error.message);

        ret
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> ErrorResponseData {
        event!(Level::DEBUG, ?fields, "field errors");
        self.error.fields = Some(fields);
        self
    }
}
