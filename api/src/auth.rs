use std::sync::Arc;

use academy_auth::{
    api_key::Hash, AccessOperation, AccessRequest, AccessService, AuthenticationLayer, Grant,
    PermissionSet,
};
use academy_db::{role_permissions::RolePermission, PoolExt};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{event, Level};
use uuid::Uuid;

use crate::Error;

/// The caller behind an authenticated request.
#[derive(Clone, Debug)]
pub struct UserInfo {
    pub role: String,
    pub permissions: Arc<PermissionSet>,
}

impl UserInfo {
    pub fn must_have(&self, request: AccessRequest) -> Result<(), Error> {
        if self.permissions.allows(&request) {
            Ok(())
        } else {
            event!(Level::INFO, role=%self.role, %request, "permission denied");
            Err(Error::MissingPermission(request))
        }
    }

    pub fn must_have_on(
        &self,
        entity: &'static str,
        operation: AccessOperation,
    ) -> Result<(), Error> {
        self.must_have(AccessRequest::project(entity, operation))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserInfo {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserInfo>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}

fn grant_from_row(row: RolePermission) -> Option<Grant> {
    let service = row.service.parse::<AccessService>();
    let operation = row.operation.parse::<AccessOperation>();
    match (service, operation) {
        (Ok(service), Ok(operation)) => Some(Grant::new(service, row.entity, operation)),
        _ => {
            event!(
                Level::WARN,
                role=%row.role,
                service=%row.service,
                operation=%row.operation,
                "Ignoring unknown grant"
            );
            None
        }
    }
}

pub fn load_permissions(
    conn: &mut diesel::PgConnection,
    role: &str,
) -> Result<PermissionSet, Error> {
    let rows = academy_db::role_permissions::for_role(conn, role)?;
    Ok(rows.into_iter().filter_map(grant_from_row).collect())
}

#[derive(Clone)]
pub struct ApiKeyStore {
    pub db: academy_db::Pool,
}

#[async_trait]
impl academy_auth::api_key::ApiKeyStore for ApiKeyStore {
    type FetchData = UserInfo;
    type Error = Error;

    async fn lookup_api_key(&self, key_id: &Uuid, hash: &Hash) -> Result<UserInfo, Error> {
        let key_id = *key_id;
        let hash = hash.as_bytes().to_vec();
        self.db
            .interact(move |conn| {
                let role = academy_db::api_keys::lookup_role(conn, &key_id, &hash)?
                    .ok_or(Error::ApiKeyNotFound)?;
                let permissions = load_permissions(conn, &role)?;
                Ok::<_, Error>(UserInfo {
                    role,
                    permissions: Arc::new(permissions),
                })
            })
            .await
    }
}

pub fn auth_layer(db: academy_db::Pool) -> AuthenticationLayer<ApiKeyStore, UserInfo> {
    AuthenticationLayer::new(ApiKeyStore { db })
}
