use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid API key format")]
    InvalidApiKeyFormat,

    #[error("Invalid authorization header")]
    InvalidAuthorizationHeader,

    #[error("Unknown {0} `{1}`")]
    UnknownAccessValue(&'static str, String),
}
