use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, NaiveDate};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::{ObjectSchema, ValidationErrors};

/// The primitive type a field must hold.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    /// A whole number that fits in 32 bits.
    Integer,
    Number,
    Boolean,
    /// A calendar date in `YYYY-MM-DD` form, with no timezone.
    Date,
    /// An RFC 3339 timestamp.
    DateTime,
    /// The id of another entity: the entity name and the prefix of its ids.
    Reference {
        entity: &'static str,
        prefix: &'static str,
    },
    /// An array whose elements each validate against the schema.
    Array(Box<ObjectSchema>),
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Reference { .. } => "string",
            Self::Array(_) => "array",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldRule {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            name,
            kind,
            required: false,
            nullable: false,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn datetime(name: &'static str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn reference(name: &'static str, entity: &'static str, prefix: &'static str) -> Self {
        Self::new(name, FieldKind::Reference { entity, prefix })
    }

    pub fn array(name: &'static str, element: ObjectSchema) -> Self {
        Self::new(name, FieldKind::Array(Box::new(element)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The entity this field points at, if it is a relation field.
    pub fn references(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Reference { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// Check one value, which is `None` when the field is absent from the record.
    pub(crate) fn check(&self, path: &str, value: Option<&Value>, errors: &mut ValidationErrors) {
        let value = match value {
            None => {
                if self.required {
                    errors.add(path, required_message(path));
                }
                return;
            }
            Some(Value::Null) => {
                // `required` rejects null even when the field is also declared nullable.
                if self.required {
                    errors.add(path, required_message(path));
                } else if !self.nullable {
                    errors.add(path, format!("{path} cannot be null"));
                }
                return;
            }
            Some(v) => v,
        };

        let type_ok = match (&self.kind, value) {
            (FieldKind::String | FieldKind::Reference { .. }, Value::String(s))
                if self.required && s.is_empty() =>
            {
                errors.add(path, required_message(path));
                return;
            }
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Reference { entity, prefix }, Value::String(s)) => {
                if !is_id(prefix, s) {
                    errors.add(path, format!("{path} must be a `{entity}` id"));
                    return;
                }
                true
            }
            (FieldKind::Integer, Value::Number(n)) => match as_i32(n) {
                IntegerCheck::Fits => true,
                IntegerCheck::NotInteger => false,
                IntegerCheck::OutOfRange => {
                    errors.add(
                        path,
                        format!("{path} must be between {} and {}", i32::MIN, i32::MAX),
                    );
                    return;
                }
            },
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            (FieldKind::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(s).is_ok(),
            (FieldKind::Array(element), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    element.validate_into(&format!("{path}[{i}]"), item, errors);
                }
                true
            }
            _ => false,
        };

        if !type_ok {
            errors.add(path, type_message(path, &self.kind));
        }
    }
}

enum IntegerCheck {
    Fits,
    NotInteger,
    OutOfRange,
}

/// Whole numbers are only accepted in integer form, as `3` and not `3.0`, since
/// that is what the records decode.
fn as_i32(n: &Number) -> IntegerCheck {
    if n.is_f64() {
        return IntegerCheck::NotInteger;
    }

    match n.as_i64().map(i32::try_from) {
        Some(Ok(_)) => IntegerCheck::Fits,
        _ => IntegerCheck::OutOfRange,
    }
}

/// True if `s` is an id with the given prefix, or a bare UUID.
fn is_id(prefix: &str, s: &str) -> bool {
    match s.strip_prefix(prefix) {
        Some(encoded) => URL_SAFE_NO_PAD
            .decode(encoded)
            .map(|bytes| bytes.len() == 16)
            .unwrap_or(false),
        None => Uuid::try_parse(s).is_ok(),
    }
}

fn required_message(path: &str) -> String {
    format!("{path} is a required field")
}

fn type_message(path: &str, kind: &FieldKind) -> String {
    match kind {
        FieldKind::Integer => format!("{path} must be an integer"),
        FieldKind::Date => format!("{path} must be a `date` type (YYYY-MM-DD)"),
        FieldKind::DateTime => format!("{path} must be a `datetime` type (RFC 3339)"),
        _ => format!("{path} must be a `{}` type", kind.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(rule: &FieldRule, value: Option<Value>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        rule.check(rule.name, value.as_ref(), &mut errors);
        errors
    }

    #[test]
    fn required_rejects_missing_null_and_empty() {
        let rule = FieldRule::string("name").required();
        assert_eq!(
            check(&rule, None).get("name"),
            Some("name is a required field")
        );
        assert!(check(&rule, Some(Value::Null)).contains("name"));
        assert!(check(&rule, Some(json!(""))).contains("name"));
        assert!(check(&rule, Some(json!("Falcons"))).is_empty());
    }

    #[test]
    fn nullable_required_still_rejects_null() {
        let rule = FieldRule::reference("coach_id", "coach", "cch").nullable().required();
        assert_eq!(
            check(&rule, Some(Value::Null)).get("coach_id"),
            Some("coach_id is a required field")
        );
    }

    #[test]
    fn optional_fields() {
        let rule = FieldRule::string("description");
        assert!(check(&rule, None).is_empty());
        assert!(check(&rule, Some(json!(""))).is_empty());
        assert_eq!(
            check(&rule, Some(Value::Null)).get("description"),
            Some("description cannot be null")
        );
        assert!(check(&rule.clone().nullable(), Some(Value::Null)).is_empty());
    }

    #[test]
    fn integers() {
        let rule = FieldRule::integer("goals").required();
        assert!(check(&rule, Some(json!(0))).is_empty());
        assert!(check(&rule, Some(json!(-4))).is_empty());
        assert!(check(&rule, Some(json!(i32::MAX))).is_empty());
        assert_eq!(
            check(&rule, Some(json!(2.5))).get("goals"),
            Some("goals must be an integer")
        );
        assert_eq!(
            check(&rule, Some(json!(3.0))).get("goals"),
            Some("goals must be an integer")
        );
        assert_eq!(
            check(&rule, Some(json!(99_999_999_999i64))).get("goals"),
            Some("goals must be between -2147483648 and 2147483647")
        );
        assert!(check(&rule, Some(json!(u64::MAX))).contains("goals"));
        assert!(check(&rule, Some(json!("3"))).contains("goals"));
    }

    #[test]
    fn references_must_be_ids_of_their_entity() {
        let rule = FieldRule::reference("player_id", "player", "ply").required();
        let uuid = "0190f4a2-5c1e-7c3b-9a4e-2f6d8b1c0e57";
        let encoded = URL_SAFE_NO_PAD.encode(Uuid::parse_str(uuid).unwrap().as_bytes());

        assert!(check(&rule, Some(json!(format!("ply{encoded}")))).is_empty());
        assert!(check(&rule, Some(json!(uuid))).is_empty());
        assert_eq!(
            check(&rule, Some(json!("not-an-id"))).get("player_id"),
            Some("player_id must be a `player` id")
        );
        assert!(check(&rule, Some(json!(format!("cch{encoded}")))).contains("player_id"));
        assert!(check(&rule, Some(json!("plyAAAA"))).contains("player_id"));
        assert_eq!(
            check(&rule, Some(json!(""))).get("player_id"),
            Some("player_id is a required field")
        );
    }

    #[test]
    fn dates() {
        let rule = FieldRule::date("game_date").required();
        assert!(check(&rule, Some(json!("2024-03-09"))).is_empty());
        assert!(check(&rule, Some(json!("09/03/2024"))).contains("game_date"));

        let rule = FieldRule::datetime("created_at").required();
        assert!(check(&rule, Some(json!("2024-03-09T10:00:00Z"))).is_empty());
        assert!(check(&rule, Some(json!("2024-03-09"))).contains("created_at"));
    }
}
