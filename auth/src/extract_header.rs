use axum::http::{header::AUTHORIZATION, Request};

use crate::Error;

pub fn extract_bearer_auth_value<B>(req: &Request<B>) -> Result<Option<String>, Error> {
    match req.headers().get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => {
            let (auth_type, token) = value
                .to_str()
                .map_err(|_| Error::InvalidAuthorizationHeader)?
                .split_once(' ')
                .ok_or(Error::InvalidAuthorizationHeader)?;

            if auth_type != "Bearer" {
                return Err(Error::InvalidAuthorizationHeader);
            }

            Ok(Some(token.to_string()))
        }
    }
}
