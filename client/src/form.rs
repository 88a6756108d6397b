//! A headless controller for an entity's create or edit page.
//!
//! The controller holds the in-progress values as JSON, validates them against the
//! entity's schema, and submits them through a [ResourceClient]. A UI renders
//! [FormController::view] and forwards input events to the `set_*` methods.

use academy_auth::{AccessOperation, AccessRequest};
use academy_models::Entity;
use academy_validation::{FieldKind, FieldRule, ObjectSchema, ValidationErrors};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use tracing::{event, Level};

use crate::{
    view::{FieldView, FormView, PageView, Widget},
    ClientError, ResourceClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<ID> {
    Create,
    Edit(ID),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Loading,
    Ready,
    Submitting,
    /// The last submission failed. The values are kept and may be resubmitted.
    Error,
    /// The record to edit could not be loaded, so there is no form.
    LoadFailed,
}

/// A validated record, ready to send. Obtained from [FormController::begin_submit]
/// and handed back to [FormController::finish_submit] with the server's answer.
#[derive(Debug)]
pub struct SubmitTicket<E: Entity> {
    record: E,
}

impl<E: Entity> SubmitTicket<E> {
    pub fn record(&self) -> &E {
        &self.record
    }
}

pub struct FormController<E: Entity> {
    mode: FormMode<E::Id>,
    state: FormState,
    initial: Map<String, Value>,
    values: Map<String, Value>,
    /// The last record received from the server.
    record: Option<E>,
    field_errors: ValidationErrors,
    banner: Option<String>,
}

/// The starting value of a field on a create page.
fn default_value(rule: &FieldRule) -> Option<Value> {
    let value = match rule.kind {
        FieldKind::String => Value::String(String::new()),
        FieldKind::Integer | FieldKind::Number => Value::from(0),
        FieldKind::Boolean => Value::Bool(false),
        FieldKind::Date => date_value(Utc::now().date_naive()),
        FieldKind::DateTime => datetime_value(academy_models::now()),
        FieldKind::Reference { .. } => Value::Null,
        FieldKind::Array(_) => return None,
    };

    Some(value)
}

fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

fn datetime_value(time: DateTime<Utc>) -> Value {
    Value::String(time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Parse numeric input the way a number field does: anything that isn't a number
/// becomes 0. Whole numbers are stored as integers; fractions are kept so that
/// validation can report them.
fn coerce_number(input: &str) -> Value {
    let input = input.trim();
    if let Ok(n) = input.parse::<i64>() {
        return Value::from(n);
    }

    match input.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::from(f as i64),
        Ok(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0)),
        Err(_) => Value::from(0),
    }
}

fn record_values<E: Entity>(record: &E) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(ClientError::Validation({
            let mut errors = ValidationErrors::new();
            errors.add("", format!("{} must be an object", E::KIND.name()));
            errors
        })),
    }
}

impl<E: Entity> FormController<E> {
    /// A create page, starting from each field's default value.
    pub fn create() -> Self {
        let initial = E::schema()
            .fields
            .iter()
            .filter_map(|rule| Some((rule.name.to_string(), default_value(rule)?)))
            .collect::<Map<_, _>>();
        Self::create_with(initial)
    }

    /// A create page with some fields prefilled, e.g. the parent of a new child record.
    pub fn create_with(initial: Map<String, Value>) -> Self {
        FormController {
            mode: FormMode::Create,
            state: FormState::Ready,
            values: initial.clone(),
            initial,
            record: None,
            field_errors: ValidationErrors::new(),
            banner: None,
        }
    }

    /// An edit page waiting for its record.
    pub fn loading(id: E::Id) -> Self {
        FormController {
            mode: FormMode::Edit(id),
            state: FormState::Loading,
            initial: Map::new(),
            values: Map::new(),
            record: None,
            field_errors: ValidationErrors::new(),
            banner: None,
        }
    }

    /// Load the record for an edit page.
    pub async fn load(client: &ResourceClient<E>, id: E::Id) -> Self {
        let mut form = Self::loading(id);
        let result = client.get(id).await;
        form.loaded(result);
        form
    }

    /// Apply the result of fetching the record being edited.
    pub fn loaded(&mut self, result: Result<E, ClientError>) {
        let values = result.and_then(|record| Ok((record_values(&record)?, record)));
        match values {
            Ok((values, record)) => {
                self.initial = values.clone();
                self.values = values;
                self.record = Some(record);
                self.state = FormState::Ready;
            }
            Err(e) => {
                event!(Level::WARN, entity = %E::KIND, error = %e, "failed to load record");
                self.banner = Some(load_error_message(&e));
                self.state = FormState::LoadFailed;
            }
        }
    }

    pub fn mode(&self) -> FormMode<E::Id> {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn record(&self) -> Option<&E> {
        self.record.as_ref()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// The permission a user needs to see this page.
    pub fn access(&self) -> AccessRequest {
        let operation = match self.mode {
            FormMode::Create => AccessOperation::Create,
            FormMode::Edit(_) => AccessOperation::Update,
        };
        AccessRequest::project(E::KIND.name(), operation)
    }

    fn has_form(&self) -> bool {
        matches!(
            self.state,
            FormState::Ready | FormState::Submitting | FormState::Error
        )
    }

    fn rule(&self, name: &str) -> Option<&'static FieldRule> {
        E::schema().rule(name)
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ClientError> {
        self.update_values(|values| {
            values.insert(name.to_string(), value);
        })
    }

    fn update_values(
        &mut self,
        f: impl FnOnce(&mut Map<String, Value>),
    ) -> Result<(), ClientError> {
        if !self.has_form() {
            return Err(ClientError::NotReady);
        }

        f(&mut self.values);

        // Once errors are showing, keep them in step with the edits.
        if !self.field_errors.is_empty() {
            self.field_errors = self.check().err().unwrap_or_default();
        }

        Ok(())
    }

    pub fn set_text(&mut self, name: &str, text: &str) -> Result<(), ClientError> {
        self.set_field(name, Value::String(text.to_string()))
    }

    /// Set a numeric field from raw input. Input that is not a number is stored as 0.
    pub fn set_number(&mut self, name: &str, input: &str) -> Result<(), ClientError> {
        self.set_field(name, coerce_number(input))
    }

    pub fn set_bool(&mut self, name: &str, checked: bool) -> Result<(), ClientError> {
        self.set_field(name, Value::Bool(checked))
    }

    pub fn set_date(&mut self, name: &str, date: NaiveDate) -> Result<(), ClientError> {
        self.set_field(name, date_value(date))
    }

    pub fn set_datetime(&mut self, name: &str, time: DateTime<Utc>) -> Result<(), ClientError> {
        self.set_field(name, datetime_value(time))
    }

    /// Empty a field. Optional fields that can't hold null are left unset instead.
    pub fn clear_field(&mut self, name: &str) -> Result<(), ClientError> {
        match self.rule(name) {
            Some(rule) if !rule.required && !rule.nullable => self.update_values(|values| {
                values.remove(name);
            }),
            _ => self.set_field(name, Value::Null),
        }
    }

    fn check(&self) -> Result<(), ValidationErrors> {
        E::schema().validate(&Value::Object(self.values.clone()))
    }

    /// Validate the current values, updating the inline errors. Returns true if valid.
    pub fn validate(&mut self) -> bool {
        self.field_errors = self.check().err().unwrap_or_default();
        self.field_errors.is_empty()
    }

    /// Validate and decode the values for sending. The controller stays in
    /// `Submitting` until [Self::finish_submit] or [Self::abandon_submit].
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<E>, ClientError> {
        match self.state {
            FormState::Ready | FormState::Error => {}
            FormState::Submitting => return Err(ClientError::SubmitInProgress),
            FormState::Loading | FormState::LoadFailed => return Err(ClientError::NotReady),
        }

        let record = match E::schema().decode::<E>(Value::Object(self.values.clone())) {
            Ok(record) => record,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(ClientError::Validation(errors));
            }
        };

        self.field_errors = ValidationErrors::new();
        self.banner = None;
        self.state = FormState::Submitting;
        Ok(SubmitTicket { record })
    }

    /// Apply the server's answer to a submission.
    pub fn finish_submit(
        &mut self,
        _ticket: SubmitTicket<E>,
        result: Result<E, ClientError>,
    ) -> Result<E, ClientError> {
        let result = result.and_then(|saved| Ok((record_values(&saved)?, saved)));
        match result {
            Ok((saved_values, saved)) => {
                self.values = match self.mode {
                    FormMode::Create => self.initial.clone(),
                    FormMode::Edit(_) => {
                        self.initial = saved_values.clone();
                        saved_values
                    }
                };
                self.record = Some(saved.clone());
                self.field_errors = ValidationErrors::new();
                self.banner = None;
                self.state = FormState::Ready;
                Ok(saved)
            }
            Err(e) => {
                event!(Level::INFO, entity = %E::KIND, error = %e, "submission failed");
                if let Some(fields) = e.field_errors() {
                    self.field_errors = fields;
                }
                self.banner = Some(e.to_string());
                self.state = FormState::Error;
                Err(e)
            }
        }
    }

    /// Give up on an in-flight submission, e.g. because the page was left.
    pub fn abandon_submit(&mut self) {
        if self.state == FormState::Submitting {
            self.state = FormState::Ready;
        }
    }

    /// Validate, send to the server, and apply the result.
    pub async fn submit(&mut self, client: &ResourceClient<E>) -> Result<E, ClientError> {
        let ticket = self.begin_submit()?;
        let result = match self.mode {
            FormMode::Create => client.create(ticket.record()).await,
            FormMode::Edit(id) => client.update(id, ticket.record()).await,
        };
        self.finish_submit(ticket, result)
    }

    fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Create {}", E::KIND.label()),
            FormMode::Edit(_) => format!("Edit {}", E::KIND.label()),
        }
    }

    pub fn view(&self) -> PageView {
        match self.state {
            FormState::Loading => PageView::Loading,
            FormState::LoadFailed => PageView::Error {
                message: self
                    .banner
                    .clone()
                    .unwrap_or_else(|| "Failed to load".to_string()),
            },
            FormState::Ready | FormState::Submitting | FormState::Error => {
                PageView::Form(self.form_view(E::schema()))
            }
        }
    }

    fn form_view(&self, schema: &ObjectSchema) -> FormView {
        let fields = schema
            .fields
            .iter()
            .filter_map(|rule| {
                let widget = Widget::for_rule(rule)?;
                Some(FieldView {
                    name: rule.name,
                    label: rule.name,
                    widget,
                    required: rule.required,
                    value: self.values.get(rule.name).cloned().unwrap_or(Value::Null),
                    error: self.field_errors.get(rule.name).map(str::to_string),
                })
            })
            .collect();

        FormView {
            title: self.title(),
            fields,
            banner: self.banner.clone(),
            submit_enabled: self.state != FormState::Submitting && self.field_errors.is_empty(),
        }
    }
}

fn load_error_message(err: &ClientError) -> String {
    match err {
        ClientError::NotFound => "Not found".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use academy_models::{
        exercise::Exercise,
        object_id::{PlayerId, PlayerPerformanceId, TrainingPlanId},
        player_performance::PlayerPerformance,
    };
    use assert_matches::assert_matches;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    fn performance() -> PlayerPerformance {
        let mut record = PlayerPerformance::new(
            PlayerId::new(),
            NaiveDate::from_ymd_opt(2024, 4, 13).unwrap(),
        );
        record.id = Some(PlayerPerformanceId::new());
        record.goals = 1;
        record
    }

    fn edit_form(record: &PlayerPerformance) -> FormController<PlayerPerformance> {
        let mut form = FormController::loading(record.id.unwrap());
        form.loaded(Ok(record.clone()));
        form
    }

    #[test]
    fn create_defaults() {
        let form = FormController::<PlayerPerformance>::create();
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.value("goals"), Some(&json!(0)));
        assert_eq!(form.value("player_id"), Some(&Value::Null));
        assert!(form.value("game_date").unwrap().is_string());
        assert_eq!(
            form.access(),
            AccessRequest::project("player_performance", AccessOperation::Create)
        );
    }

    #[test]
    fn non_numeric_input_becomes_zero() {
        let record = performance();
        let mut form = edit_form(&record);

        form.set_number("goals", "two").unwrap();
        assert_eq!(form.value("goals"), Some(&json!(0)));
        form.set_number("assists", " 3 ").unwrap();
        assert_eq!(form.value("assists"), Some(&json!(3)));

        let ticket = form.begin_submit().unwrap();
        assert_eq!(ticket.record().goals, 0);
        assert_eq!(ticket.record().assists, 3);
    }

    #[test]
    fn fractions_reach_validation() {
        let mut form = edit_form(&performance());

        form.set_number("goals", "2.5").unwrap();
        assert_eq!(form.value("goals"), Some(&json!(2.5)));
        form.set_number("assists", "3.0").unwrap();
        assert_eq!(form.value("assists"), Some(&json!(3)));

        assert_matches!(form.begin_submit(), Err(ClientError::Validation(_)));
        assert_eq!(form.field_errors().get("goals"), Some("goals must be an integer"));
        assert!(!form.field_errors().contains("assists"));
    }

    #[test]
    fn values_the_record_cannot_hold_are_shown_inline() {
        let mut form = edit_form(&performance());
        form.set_number("goals", "99999999999").unwrap();
        form.set_text("player_id", "not-an-id").unwrap();

        assert!(!form.validate());
        let err = form.begin_submit().unwrap_err();
        assert_matches!(err, ClientError::Validation(_));
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(
            form.field_errors().get("goals"),
            Some("goals must be between -2147483648 and 2147483647")
        );
        assert_eq!(
            form.field_errors().get("player_id"),
            Some("player_id must be a `player` id")
        );

        let view = form.view();
        let field = view.form().unwrap().field("player_id").unwrap();
        assert_eq!(field.error.as_deref(), Some("player_id must be a `player` id"));
    }

    #[test]
    fn clearing_an_optional_field_unsets_it() {
        let mut form = FormController::<Exercise>::create();
        form.set_text("name", "Sprints").unwrap();
        form.set_number("duration", "20").unwrap();
        form.set_text("training_plan_id", &TrainingPlanId::new().to_string()).unwrap();
        form.set_text("description", "Ten by forty metres").unwrap();

        form.clear_field("description").unwrap();
        assert_eq!(form.value("description"), None);
        assert!(form.validate());
        let ticket = form.begin_submit().unwrap();
        assert_eq!(ticket.record().description, None);

        // Required fields are still cleared to null and reported.
        form.abandon_submit();
        form.clear_field("name").unwrap();
        assert_eq!(form.value("name"), Some(&Value::Null));
        assert!(!form.validate());
    }

    #[test]
    fn validation_blocks_submission() {
        let mut form = edit_form(&performance());
        form.clear_field("player_id").unwrap();

        let err = form.begin_submit().unwrap_err();
        assert_matches!(err, ClientError::Validation(_));
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(
            form.field_errors().get("player_id"),
            Some("player_id is a required field")
        );

        let view = form.view();
        let view = view.form().unwrap();
        assert!(!view.submit_enabled);
        assert_eq!(
            view.field("player_id").unwrap().error.as_deref(),
            Some("player_id is a required field")
        );

        // Fixing the field clears its message.
        form.set_text("player_id", &PlayerId::new().to_string()).unwrap();
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn one_submission_at_a_time() {
        let mut form = edit_form(&performance());
        let _ticket = form.begin_submit().unwrap();
        assert_eq!(form.state(), FormState::Submitting);
        assert_matches!(form.begin_submit(), Err(ClientError::SubmitInProgress));
        assert!(!form.view().form().unwrap().submit_enabled);

        form.abandon_submit();
        assert_eq!(form.state(), FormState::Ready);
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn failed_update_keeps_values() {
        let record = performance();
        let mut form = edit_form(&record);
        form.set_number("minutes_played", "75").unwrap();

        let ticket = form.begin_submit().unwrap();
        let err = ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal_server_error".to_string(),
            message: "Internal error".to_string(),
            fields: Default::default(),
        };
        assert!(form.finish_submit(ticket, Err(err)).is_err());

        assert_eq!(form.state(), FormState::Error);
        assert_eq!(form.banner(), Some("Internal error"));
        assert_eq!(form.value("minutes_played"), Some(&json!(75)));
        assert_eq!(form.record(), Some(&record), "cached record is unchanged");

        // Resubmitting is allowed and clears the banner.
        let ticket = form.begin_submit().unwrap();
        assert_eq!(form.banner(), None);
        let mut saved = ticket.record().clone();
        saved.updated_at = Some(academy_models::now());
        form.finish_submit(ticket, Ok(saved.clone())).unwrap();
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.record(), Some(&saved));
        assert_eq!(form.value("minutes_played"), Some(&json!(75)));
    }

    #[test]
    fn server_field_errors_are_shown_inline() {
        let mut form = edit_form(&performance());
        let ticket = form.begin_submit().unwrap();
        let err = ClientError::Api {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            kind: "invalid_reference".to_string(),
            message: "Referenced record does not exist".to_string(),
            fields: [("player_id".to_string(), "Unknown player".to_string())]
                .into_iter()
                .collect(),
        };
        let _ = form.finish_submit(ticket, Err(err));
        assert_eq!(form.field_errors().get("player_id"), Some("Unknown player"));
    }

    #[test]
    fn create_resets_to_initial_values() {
        let mut form = FormController::<PlayerPerformance>::create();
        form.set_text("player_id", &PlayerId::new().to_string()).unwrap();
        form.set_number("goals", "4").unwrap();

        let ticket = form.begin_submit().unwrap();
        let mut saved = ticket.record().clone();
        saved.id = Some(PlayerPerformanceId::new());
        form.finish_submit(ticket, Ok(saved)).unwrap();

        assert_eq!(form.value("goals"), Some(&json!(0)));
        assert_eq!(form.value("player_id"), Some(&Value::Null));
    }

    #[test]
    fn missing_record_shows_no_form() {
        let mut form = FormController::<PlayerPerformance>::loading(PlayerPerformanceId::new());
        assert_eq!(form.view(), PageView::Loading);

        form.loaded(Err(ClientError::NotFound));
        assert_eq!(form.state(), FormState::LoadFailed);
        assert_eq!(
            form.view(),
            PageView::Error {
                message: "Not found".to_string()
            }
        );
        assert_matches!(form.set_text("goals", "1"), Err(ClientError::NotReady));
        assert_matches!(form.begin_submit(), Err(ClientError::NotReady));
    }
}
