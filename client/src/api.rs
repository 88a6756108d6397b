use std::{marker::PhantomData, time::Duration};

use academy_http_errors::ErrorResponseData;
use academy_models::{Entity, EntityKind};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{event, instrument, Level};

use crate::ClientError;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The server's base URL, e.g. `http://localhost:7205`
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;

        Ok(ApiClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
        })
    }

    /// A client sharing this one's connection pool that authenticates with a different key.
    pub fn clone_with_api_key(&self, api_key: impl Into<String>) -> Self {
        ApiClient {
            base_url: self.base_url.clone(),
            api_key: Some(api_key.into()),
            client: self.client.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request to a path under the base URL, with the API key attached.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn resource<E: Entity>(&self) -> ResourceClient<E> {
        ResourceClient {
            client: self.clone(),
            entity: PhantomData,
        }
    }
}

/// Turn a response into its JSON body, or the error the server described.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let body = response.bytes().await?;
    let err = match serde_json::from_slice::<ErrorResponseData>(&body) {
        Ok(data) => ClientError::Api {
            status,
            kind: data.error.kind.into_owned(),
            message: data.error.message.into_owned(),
            fields: data.error.fields.unwrap_or_default(),
        },
        Err(_) => ClientError::Api {
            status,
            kind: "http".to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            fields: Default::default(),
        },
    };

    event!(Level::DEBUG, %status, kind = err.kind(), "request failed");
    Err(err)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

/// Query parameters for a list request. Unset values use the server's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub relations: Vec<EntityKind>,
    pub count: bool,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn relation(mut self, relation: EntityKind) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        params.extend(relation_params(&self.relations, self.count));
        params
    }
}

fn relation_params(relations: &[EntityKind], count: bool) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !relations.is_empty() {
        let names = relations
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("relations", names));
    }
    if count {
        params.push(("count", "true".to_string()));
    }
    params
}

/// CRUD operations for one entity's resource path.
#[derive(Debug)]
pub struct ResourceClient<E: Entity> {
    client: ApiClient,
    entity: PhantomData<E>,
}

impl<E: Entity> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        ResourceClient {
            client: self.client.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> ResourceClient<E> {
    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn path(&self) -> &'static str {
        E::KIND.path()
    }

    fn item_path(&self, id: &E::Id) -> String {
        format!("{}/{}", self.path(), id)
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<E>, ClientError> {
        let response = self
            .client
            .get(self.path())
            .query(&query.to_params())
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn get(&self, id: E::Id) -> Result<E, ClientError> {
        self.get_with(id, &[], false).await
    }

    /// Get a record with some of its relations embedded.
    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn get_with(
        &self,
        id: E::Id,
        relations: &[EntityKind],
        count: bool,
    ) -> Result<E, ClientError> {
        let response = self
            .client
            .get(&self.item_path(&id))
            .query(&relation_params(relations, count))
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self, record), fields(entity = %E::KIND))]
    pub async fn create(&self, record: &E) -> Result<E, ClientError> {
        let response = self
            .client
            .request(Method::POST, self.path())
            .json(record)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self, record), fields(entity = %E::KIND))]
    pub async fn update(&self, id: E::Id, record: &E) -> Result<E, ClientError> {
        let response = self
            .client
            .request(Method::PUT, &self.item_path(&id))
            .json(record)
            .send()
            .await?;
        handle_response(response).await
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn delete(&self, id: E::Id) -> Result<(), ClientError> {
        let response = self
            .client
            .request(Method::DELETE, &self.item_path(&id))
            .send()
            .await?;
        handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use academy_models::{
        object_id::{AcademyId, PlayerId, PlayerPerformanceId, TeamId},
        player_performance::PlayerPerformance,
        team::Team,
    };
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.uri()).api_key("ak1.test")).unwrap()
    }

    #[test]
    fn list_query_params() {
        let query = ListQuery::new()
            .limit(10)
            .search("fal")
            .relation(EntityKind::Academy)
            .relation(EntityKind::Player)
            .count();
        assert_eq!(
            query.to_params(),
            vec![
                ("limit", "10".to_string()),
                ("search", "fal".to_string()),
                ("relations", "academy,player".to_string()),
                ("count", "true".to_string()),
            ]
        );
        assert!(ListQuery::new().search("").to_params().is_empty());
    }

    #[tokio::test]
    async fn list_passes_query_and_key() {
        let server = MockServer::start().await;
        let team = Team::new("Falcons", AcademyId::new());

        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("search", "fal"))
            .and(query_param("limit", "5"))
            .and(header("authorization", "Bearer ak1.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [team],
                "totalCount": 7
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .await
            .resource::<Team>()
            .list(&ListQuery::new().search("fal").limit(5))
            .await
            .unwrap();
        assert_eq!(page.total_count, 7);
        assert_eq!(page.data, vec![team]);
    }

    #[tokio::test]
    async fn update_puts_to_item_path() {
        let server = MockServer::start().await;
        let id = PlayerPerformanceId::new();
        let mut record = PlayerPerformance::new(
            PlayerId::new(),
            chrono::NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
        );
        record.id = Some(id);
        record.goals = 2;

        Mock::given(method("PUT"))
            .and(path(format!("/player-performances/{id}")))
            .and(body_json(&record))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        let updated = client(&server)
            .await
            .resource::<PlayerPerformance>()
            .update(id, &record)
            .await
            .unwrap();
        assert_eq!(updated.goals, 2);
    }

    #[tokio::test]
    async fn not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "kind": "not_found", "message": "Not found" }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .resource::<Team>()
            .get(TeamId::new())
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::NotFound);
    }

    #[tokio::test]
    async fn error_body_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": {
                    "kind": "validation",
                    "message": "Validation failed",
                    "fields": { "name": "name is a required field" }
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .resource::<Team>()
            .create(&Team::new("", AcademyId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.kind(), "validation");
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("name"), Some("name is a required field"));
    }

    #[tokio::test]
    async fn unparseable_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .resource::<Team>()
            .delete(TeamId::new())
            .await
            .unwrap_err();
        assert_matches!(err, ClientError::Api { status, kind, .. } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(kind, "http");
        });
    }
}
