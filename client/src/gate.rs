//! The access check that runs before a page is shown.

use academy_auth::{AccessRequest, PermissionSet};
use tracing::{event, Level};

/// The signed-in user, as far as page access is concerned.
#[derive(Debug, Clone)]
pub struct Session {
    pub role: String,
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    RedirectToLogin,
    Forbidden,
}

pub fn gate(session: Option<&Session>, request: &AccessRequest) -> GateDecision {
    let Some(session) = session else {
        return GateDecision::RedirectToLogin;
    };

    if session.permissions.allows(request) {
        GateDecision::Render
    } else {
        event!(Level::DEBUG, role = %session.role, %request, "page forbidden");
        GateDecision::Forbidden
    }
}
