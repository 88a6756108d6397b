use std::any::Any;

use academy_http_errors::ErrorResponseData;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

fn panic_message(err: &(dyn Any + Send)) -> String {
    err.downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "Unknown panic message".to_string())
}

/// Turn a handler panic into a 500 with the usual error body. The panic
/// message is only included outside production.
pub fn handle_panic(production: bool, err: Box<dyn Any + Send + 'static>) -> Response {
    let message = match production {
        true => "Server error".to_string(),
        false => panic_message(err.as_ref()),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponseData::new("panic", message)),
    )
        .into_response()
}
