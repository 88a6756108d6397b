use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FieldRule, ValidationErrors};

/// A declarative ruleset for one entity.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub entity: &'static str,
    pub fields: Vec<FieldRule>,
}

impl ObjectSchema {
    pub fn new(entity: &'static str) -> Self {
        ObjectSchema {
            entity,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Validate a candidate record. Fields the schema does not declare are ignored.
    pub fn validate(&self, candidate: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.validate_into("", candidate, &mut errors);
        errors.into_result()
    }

    /// Validate a candidate record and decode it. A value that passes the rules
    /// but still doesn't fit the record type is reported at its path.
    pub fn decode<T: DeserializeOwned>(&self, candidate: Value) -> Result<T, ValidationErrors> {
        self.validate(&candidate)?;
        serde_path_to_error::deserialize(candidate).map_err(|e| {
            let path = match e.path().to_string() {
                root if root == "." => String::new(),
                path => path,
            };
            let message = match path.as_str() {
                "" => format!("{} is invalid: {}", self.entity, e.inner()),
                path => format!("{path} is invalid: {}", e.inner()),
            };

            let mut errors = ValidationErrors::new();
            errors.add(path, message);
            errors
        })
    }

    pub(crate) fn validate_into(
        &self,
        prefix: &str,
        candidate: &Value,
        errors: &mut ValidationErrors,
    ) {
        let Value::Object(record) = candidate else {
            let message = if prefix.is_empty() {
                format!("{} must be an object", self.entity)
            } else {
                format!("{prefix} must be a `object` type")
            };
            errors.add(prefix, message);
            return;
        };

        for rule in &self.fields {
            let path = if prefix.is_empty() {
                rule.name.to_string()
            } else {
                format!("{prefix}.{}", rule.name)
            };

            rule.check(&path, record.get(rule.name), errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> ObjectSchema {
        ObjectSchema::new("plan")
            .field(FieldRule::string("name").required())
            .field(FieldRule::array(
                "exercise",
                ObjectSchema::new("exercise")
                    .field(FieldRule::string("name").required())
                    .field(FieldRule::integer("duration").required()),
            ))
    }

    #[test]
    fn accepts_valid_record() {
        let record = json!({
            "name": "Pre-season",
            "unknown": 5,
            "exercise": [{ "name": "Sprints", "duration": 20 }]
        });
        assert_eq!(schema().validate(&record), Ok(()));
    }

    #[test]
    fn nested_paths() {
        let record = json!({
            "exercise": [
                { "name": "Sprints", "duration": 20 },
                { "duration": "long" },
                7
            ]
        });

        let errors = schema().validate(&record).unwrap_err();
        assert_eq!(errors.get("name"), Some("name is a required field"));
        assert_eq!(
            errors.get("exercise[1].name"),
            Some("exercise[1].name is a required field")
        );
        assert_eq!(
            errors.get("exercise[1].duration"),
            Some("exercise[1].duration must be an integer")
        );
        assert!(errors.contains("exercise[2]"));
        assert_eq!(errors.len(), 4);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Plan {
        name: String,
        #[serde(default)]
        exercise: Vec<Exercise>,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Exercise {
        duration: u8,
    }

    #[test]
    fn decode_typed_record() {
        let plan: Plan = schema()
            .decode(json!({
                "name": "Pre-season",
                "exercise": [{ "name": "Sprints", "duration": 20 }]
            }))
            .unwrap();
        assert_eq!(plan.name, "Pre-season");
        assert_eq!(plan.exercise[0].duration, 20);
    }

    #[test]
    fn decode_reports_rule_violations() {
        let errors = schema().decode::<Plan>(json!({ "exercise": [] })).unwrap_err();
        assert_eq!(errors.get("name"), Some("name is a required field"));
    }

    #[test]
    fn decode_failure_is_reported_at_its_path() {
        // 300 passes the integer rule but doesn't fit the record's field.
        let record = json!({
            "name": "Pre-season",
            "exercise": [
                { "name": "Sprints", "duration": 20 },
                { "name": "Laps", "duration": 300 }
            ]
        });

        let errors = schema().decode::<Plan>(record).unwrap_err();
        assert_eq!(errors.len(), 1);
        let message = errors.get("exercise[1].duration").unwrap();
        assert!(
            message.starts_with("exercise[1].duration is invalid: "),
            "{message}"
        );
    }

    #[test]
    fn non_object_candidate() {
        let errors = schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.get(""), Some("plan must be an object"));
    }
}
