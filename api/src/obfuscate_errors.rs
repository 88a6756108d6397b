use academy_http_errors::ErrorResponseData;
use axum::{
    body::{Body, BoxBody},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use tower::{Layer, Service};

/// Replaces the body of server and auth errors with a generic message, so that
/// production responses don't leak internal details.
#[derive(Clone)]
pub struct ObfuscateErrorLayer {
    enabled: bool,
}

impl ObfuscateErrorLayer {
    pub fn new(enabled: bool) -> ObfuscateErrorLayer {
        ObfuscateErrorLayer { enabled }
    }
}

impl<S> Layer<S> for ObfuscateErrorLayer {
    type Service = ObfuscateError<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObfuscateError {
            inner,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObfuscateError<S> {
    inner: S,
    enabled: bool,
}

fn obfuscated_message(status: StatusCode) -> Option<(&'static str, &'static str)> {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => Some(("internal_server_error", "Internal error")),
        StatusCode::UNAUTHORIZED => Some(("authn", "Unauthorized")),
        StatusCode::FORBIDDEN => Some(("missing_permission", "Forbidden")),
        _ => None,
    }
}

impl<S> Service<Request<Body>> for ObfuscateError<S>
where
    S: Service<Request<Body>> + Send + 'static,
    S::Future: Send + 'static,
    S::Response: IntoResponse + Send + 'static,
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let enabled = self.enabled;
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await?.into_response();
            if !enabled {
                return Ok(res);
            }

            let status = res.status();
            let Some((kind, message)) = obfuscated_message(status) else {
                return Ok(res);
            };

            Ok((status, Json(ErrorResponseData::new(kind, message))).into_response())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::{service_fn, ServiceExt};

    use super::*;

    async fn call(enabled: bool, status: StatusCode) -> serde_json::Value {
        let svc = ObfuscateErrorLayer::new(enabled).layer(service_fn(move |_req| async move {
            let body = json!({
                "error": { "kind": "db", "message": "relation \"teams\" does not exist" }
            });
            Ok::<_, std::convert::Infallible>((status, Json(body)))
        }));

        let res = svc
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), status);
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hides_server_errors_when_enabled() {
        let body = call(true, StatusCode::INTERNAL_SERVER_ERROR).await;
        assert_eq!(body["error"]["message"], "Internal error");
    }

    #[tokio::test]
    async fn passes_through_when_disabled() {
        let body = call(false, StatusCode::INTERNAL_SERVER_ERROR).await;
        assert_eq!(body["error"]["kind"], "db");
    }

    #[tokio::test]
    async fn leaves_client_errors_alone() {
        let body = call(true, StatusCode::NOT_FOUND).await;
        assert_eq!(body["error"]["kind"], "db");
    }
}
