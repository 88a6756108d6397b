use std::marker::PhantomData;

use axum::{
    body::{Body, BoxBody},
    http::{Request, Response},
    response::IntoResponse,
};
use futures::future::BoxFuture;
use tower::{Layer, Service};

use crate::api_key::{extract_api_key, ApiKeyManager, ApiKeyStore};

/// Looks up the API key on each request and, when one is present, inserts
/// `USERDATA` into the request extensions. Requests without a key pass through
/// unchanged so that handlers decide whether authentication is required.
pub struct AuthenticationLayer<STORE: ApiKeyStore, USERDATA>
where
    USERDATA: From<STORE::FetchData> + Clone + Send + Sync + 'static,
{
    pub api_keys: ApiKeyManager<STORE>,
    user_data_phantom: PhantomData<USERDATA>,
}

impl<STORE: ApiKeyStore, USERDATA> AuthenticationLayer<STORE, USERDATA>
where
    USERDATA: From<STORE::FetchData> + Clone + Send + Sync + 'static,
{
    pub fn new(api_key_store: STORE) -> Self {
        Self {
            api_keys: ApiKeyManager::new(api_key_store),
            user_data_phantom: PhantomData,
        }
    }
}

impl<STORE: ApiKeyStore, USERDATA> Clone for AuthenticationLayer<STORE, USERDATA>
where
    USERDATA: From<STORE::FetchData> + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            api_keys: self.api_keys.clone(),
            user_data_phantom: PhantomData,
        }
    }
}

impl<S, STORE: ApiKeyStore, USERDATA> Layer<S> for AuthenticationLayer<STORE, USERDATA>
where
    USERDATA: From<STORE::FetchData> + Clone + Send + Sync + 'static,
{
    type Service = Authenticator<S, STORE, USERDATA>;

    fn layer(&self, inner: S) -> Self::Service {
        Authenticator {
            api_keys: self.api_keys.clone(),
            user_data_phantom: PhantomData,
            inner,
        }
    }
}

pub struct Authenticator<S, STORE: ApiKeyStore, USERDATA> {
    api_keys: ApiKeyManager<STORE>,
    user_data_phantom: PhantomData<USERDATA>,
    inner: S,
}

impl<S: Clone, STORE: ApiKeyStore, USERDATA> Clone for Authenticator<S, STORE, USERDATA> {
    fn clone(&self) -> Self {
        Self {
            api_keys: self.api_keys.clone(),
            user_data_phantom: PhantomData,
            inner: self.inner.clone(),
        }
    }
}

impl<S, STORE, USERDATA> Service<Request<Body>> for Authenticator<S, STORE, USERDATA>
where
    S: Service<Request<Body>> + Send + Clone + 'static,
    S::Future: Send + 'static,
    S::Response: IntoResponse + Send + 'static,
    STORE: ApiKeyStore,
    USERDATA: From<STORE::FetchData> + Clone + Send + Sync + 'static,
{
    type Response = Response<BoxBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let inner = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner);

        let api_keys = self.api_keys.clone();
        let key = extract_api_key(&req);
        Box::pin(async move {
            let key = match key {
                Ok(Some(key)) => key,
                Ok(None) => return Ok(inner.call(req).await?.into_response()),
                Err(e) => return Ok(STORE::Error::from(e).into_response()),
            };

            match api_keys.lookup(&key).await {
                Ok(data) => {
                    req.extensions_mut().insert(USERDATA::from(data));
                }
                Err(e) => return Ok(e.into_response()),
            }

            Ok(inner.call(req).await?.into_response())
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use tower::{service_fn, ServiceExt};
    use uuid::Uuid;

    use super::*;
    use crate::api_key::{ApiKeyData, Hash};

    #[derive(Clone)]
    struct OneKeyStore {
        id: Uuid,
        hash: Hash,
    }

    #[derive(Debug)]
    struct StoreError;

    impl From<crate::Error> for StoreError {
        fn from(_: crate::Error) -> Self {
            StoreError
        }
    }

    impl IntoResponse for StoreError {
        fn into_response(self) -> Response {
            StatusCode::UNAUTHORIZED.into_response()
        }
    }

    #[derive(Clone, Debug)]
    struct User(#[allow(dead_code)] Uuid);

    impl From<Uuid> for User {
        fn from(id: Uuid) -> Self {
            User(id)
        }
    }

    #[async_trait]
    impl ApiKeyStore for OneKeyStore {
        type FetchData = Uuid;
        type Error = StoreError;

        async fn lookup_api_key(&self, key_id: &Uuid, hash: &Hash) -> Result<Uuid, StoreError> {
            if key_id == &self.id && hash == &self.hash {
                Ok(*key_id)
            } else {
                Err(StoreError)
            }
        }
    }

    async fn call(store: OneKeyStore, auth: Option<String>) -> StatusCode {
        let layer = AuthenticationLayer::<_, User>::new(store);
        let svc = layer.layer(service_fn(|req: Request<Body>| async move {
            let status = match req.extensions().get::<User>() {
                Some(_) => StatusCode::OK,
                None => StatusCode::NO_CONTENT,
            };
            Ok::<_, std::convert::Infallible>(status)
        }));

        let mut builder = Request::builder().uri("/teams");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let response = svc.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        response.status()
    }

    #[tokio::test]
    async fn valid_key_sets_user() {
        let data = ApiKeyData::new(None);
        let store = OneKeyStore {
            id: data.api_key_id,
            hash: data.hash,
        };
        let status = call(store, Some(format!("Bearer {}", data.key))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_key_passes_through() {
        let data = ApiKeyData::new(None);
        let store = OneKeyStore {
            id: data.api_key_id,
            hash: data.hash,
        };
        let status = call(store, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let data = ApiKeyData::new(None);
        let other = ApiKeyData::new(None);
        let store = OneKeyStore {
            id: data.api_key_id,
            hash: data.hash,
        };
        let status = call(store, Some(format!("Bearer {}", other.key))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
