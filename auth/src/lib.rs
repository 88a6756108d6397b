pub mod access;
pub mod api_key;
mod error;
mod extract_header;
mod request;

pub use access::{AccessOperation, AccessRequest, AccessService, Grant, PermissionSet, ANY_ENTITY};
pub use error::*;
pub use extract_header::extract_bearer_auth_value;
pub use request::*;
