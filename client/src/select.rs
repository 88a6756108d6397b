use academy_models::Entity;
use serde_json::Value;

use crate::{ClientError, ListQuery, ResourceClient};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// The record's id, as stored in the foreign key field.
    pub value: String,
    pub label: String,
}

/// The label shown for a record: its display column, or its id when it has none.
pub fn option_for<E: Entity>(record: &E) -> Option<SelectOption> {
    let value = record.id()?.to_string();
    let label = E::KIND
        .display_field()
        .and_then(|field| {
            let json = serde_json::to_value(record).ok()?;
            match json.get(field)? {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            }
        })
        .unwrap_or_else(|| value.clone());

    Some(SelectOption { value, label })
}

/// A searchable, paged list of records to choose a relation from.
pub struct RelationSelect<E: Entity> {
    client: ResourceClient<E>,
    page_size: i64,
    search: Option<String>,
    options: Vec<SelectOption>,
    loaded: i64,
    total: Option<i64>,
}

impl<E: Entity> RelationSelect<E> {
    pub fn new(client: ResourceClient<E>) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(client: ResourceClient<E>, page_size: i64) -> Self {
        RelationSelect {
            client,
            page_size,
            search: None,
            options: Vec::new(),
            loaded: 0,
            total: None,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn has_more(&self) -> bool {
        self.total.map(|total| self.loaded < total).unwrap_or(true)
    }

    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Start over with new search text and load the first page.
    pub async fn search(&mut self, text: &str) -> Result<&[SelectOption], ClientError> {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_string());
        self.options.clear();
        self.loaded = 0;
        self.total = None;
        self.load_more().await?;
        Ok(&self.options)
    }

    /// Append the next page of options. Returns false once every match is loaded.
    pub async fn load_more(&mut self) -> Result<bool, ClientError> {
        if !self.has_more() {
            return Ok(false);
        }

        let mut query = ListQuery::new().limit(self.page_size).offset(self.loaded);
        if let Some(search) = &self.search {
            query = query.search(search.clone());
        }

        let page = self.client.list(&query).await?;
        self.loaded += page.data.len() as i64;
        // A short page means the list ended even if the count says otherwise.
        self.total = if page.data.is_empty() {
            Some(self.loaded)
        } else {
            Some(page.total_count)
        };
        self.options
            .extend(page.data.iter().filter_map(option_for::<E>));

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use academy_models::{
        object_id::{PlayerId, TeamId},
        player::Player,
        player_training_plan::PlayerTrainingPlan,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{ApiClient, ClientConfig};

    fn player(user_id: &str) -> Player {
        let mut player = Player::new(user_id, TeamId::new());
        player.id = Some(PlayerId::new());
        player
    }

    #[test]
    fn labels_use_display_field() {
        let p = player("user-17");
        let option = option_for(&p).unwrap();
        assert_eq!(option.label, "user-17");
        assert_eq!(option.value, p.id.unwrap().to_string());

        let unsaved = Player::new("user-18", TeamId::new());
        assert_eq!(option_for(&unsaved), None);
    }

    #[test]
    fn records_without_display_field_use_id() {
        let mut assignment = PlayerTrainingPlan::new(
            PlayerId::new(),
            academy_models::object_id::TrainingPlanId::new(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );
        let id = academy_models::object_id::PlayerTrainingPlanId::new();
        assignment.id = Some(id);
        let option = option_for(&assignment).unwrap();
        assert_eq!(option.label, id.to_string());
    }

    #[tokio::test]
    async fn pages_until_total() {
        let server = MockServer::start().await;
        let first = vec![player("a1"), player("a2")];
        let second = vec![player("a3")];

        Mock::given(method("GET"))
            .and(path("/players"))
            .and(query_param("search", "a"))
            .and(query_param("offset", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": first, "totalCount": 3 })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players"))
            .and(query_param("offset", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": second, "totalCount": 3 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(server.uri())).unwrap();
        let mut select = RelationSelect::with_page_size(client.resource::<Player>(), 2);

        let options = select.search(" a ").await.unwrap();
        assert_eq!(options.len(), 2);
        assert!(select.has_more());

        assert!(select.load_more().await.unwrap());
        assert_eq!(select.options().len(), 3);
        assert_eq!(select.options()[2].label, "a3");
        assert!(!select.has_more());
        assert!(!select.load_more().await.unwrap());
    }
}
