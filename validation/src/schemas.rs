//! Validation schemas for each entity of the academy domain.
//!
//! Each schema mirrors the entity's columns. Relation arrays validate their
//! elements against the related entity's own schema.

use once_cell::sync::Lazy;

use crate::{FieldRule, ObjectSchema};

static EXERCISE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("exercise")
        .field(FieldRule::string("name").required())
        .field(FieldRule::string("description"))
        .field(FieldRule::integer("duration").required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(
            FieldRule::reference("training_plan_id", "training_plan", "tpl")
                .nullable()
                .required(),
        )
});

static PLAYER_TRAINING_PLAN: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("player_training_plan")
        .field(FieldRule::date("start_date").required())
        .field(FieldRule::date("end_date").required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("player_id", "player", "ply").nullable().required())
        .field(
            FieldRule::reference("training_plan_id", "training_plan", "tpl")
                .nullable()
                .required(),
        )
});

static PLAYER_PERFORMANCE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("player_performance")
        .field(FieldRule::date("game_date").required())
        .field(FieldRule::integer("goals").required())
        .field(FieldRule::integer("assists").required())
        .field(FieldRule::integer("minutes_played").required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("player_id", "player", "ply").nullable().required())
});

static TRAINING_PLAN: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("training_plan")
        .field(FieldRule::string("name").required())
        .field(FieldRule::string("description"))
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("coach_id", "coach", "cch").nullable().required())
        .field(FieldRule::array("exercise", EXERCISE.clone()))
        .field(FieldRule::array(
            "player_training_plan",
            PLAYER_TRAINING_PLAN.clone(),
        ))
});

static PLAYER: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("player")
        .field(FieldRule::string("user_id").nullable().required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("team_id", "team", "tem").nullable().required())
        .field(FieldRule::array(
            "player_performance",
            PLAYER_PERFORMANCE.clone(),
        ))
        .field(FieldRule::array(
            "player_training_plan",
            PLAYER_TRAINING_PLAN.clone(),
        ))
});

static COACH: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("coach")
        .field(FieldRule::string("user_id").nullable().required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("team_id", "team", "tem").nullable().required())
        .field(FieldRule::array("training_plan", TRAINING_PLAN.clone()))
});

static TEAM: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("team")
        .field(FieldRule::string("name").required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::reference("academy_id", "academy", "acd").nullable().required())
        .field(FieldRule::array("coach", COACH.clone()))
        .field(FieldRule::array("player", PLAYER.clone()))
});

static ACADEMY: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("academy")
        .field(FieldRule::string("name").required())
        .field(FieldRule::string("description"))
        .field(FieldRule::string("user_id").nullable().required())
        .field(FieldRule::datetime("created_at").required())
        .field(FieldRule::datetime("updated_at").required())
        .field(FieldRule::array("team", TEAM.clone()))
});

pub fn academy() -> &'static ObjectSchema {
    &ACADEMY
}

pub fn team() -> &'static ObjectSchema {
    &TEAM
}

pub fn coach() -> &'static ObjectSchema {
    &COACH
}

pub fn player() -> &'static ObjectSchema {
    &PLAYER
}

pub fn training_plan() -> &'static ObjectSchema {
    &TRAINING_PLAN
}

pub fn exercise() -> &'static ObjectSchema {
    &EXERCISE
}

pub fn player_training_plan() -> &'static ObjectSchema {
    &PLAYER_TRAINING_PLAN
}

pub fn player_performance() -> &'static ObjectSchema {
    &PLAYER_PERFORMANCE
}

/// Look up a schema by entity name.
pub fn for_entity(entity: &str) -> Option<&'static ObjectSchema> {
    let schema = match entity {
        "academy" => academy(),
        "team" => team(),
        "coach" => coach(),
        "player" => player(),
        "training_plan" => training_plan(),
        "exercise" => exercise(),
        "player_training_plan" => player_training_plan(),
        "player_performance" => player_performance(),
        _ => return None,
    };

    Some(schema)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    const ENTITIES: [&str; 8] = [
        "academy",
        "team",
        "coach",
        "player",
        "training_plan",
        "exercise",
        "player_training_plan",
        "player_performance",
    ];

    /// Build a record that satisfies every required field of the schema.
    fn complete_record(schema: &ObjectSchema) -> Value {
        let mut record = serde_json::Map::new();
        for rule in schema.required_fields() {
            let value = match rule.kind {
                crate::FieldKind::String => json!("value"),
                crate::FieldKind::Reference { .. } => json!("0190f4a2-5c1e-7c3b-9a4e-2f6d8b1c0e57"),
                crate::FieldKind::Integer | crate::FieldKind::Number => json!(1),
                crate::FieldKind::Boolean => json!(true),
                crate::FieldKind::Date => json!("2024-01-31"),
                crate::FieldKind::DateTime => json!("2024-01-31T12:00:00Z"),
                crate::FieldKind::Array(_) => json!([]),
            };
            record.insert(rule.name.to_string(), value);
        }
        Value::Object(record)
    }

    #[test]
    fn lookup_by_name() {
        for entity in ENTITIES {
            let schema = for_entity(entity).expect(entity);
            assert_eq!(schema.entity, entity);
        }
        assert!(for_entity("stadium").is_none());
    }

    #[test]
    fn every_required_field_is_enforced() {
        for entity in ENTITIES {
            let schema = for_entity(entity).unwrap();
            let record = complete_record(schema);
            assert_eq!(schema.validate(&record), Ok(()), "{entity} complete record");

            for rule in schema.required_fields() {
                let mut missing = record.clone();
                missing.as_object_mut().unwrap().remove(rule.name);
                let errors = schema.validate(&missing).unwrap_err();
                assert_eq!(
                    errors.get(rule.name),
                    Some(format!("{} is a required field", rule.name).as_str()),
                    "{entity}.{} should be required",
                    rule.name
                );
                assert_eq!(errors.len(), 1, "{entity}.{} only error", rule.name);
            }
        }
    }

    #[test]
    fn training_plan_validates_nested_arrays() {
        let plan = json!({
            "name": "Pre-season",
            "created_at": "2024-01-31T12:00:00Z",
            "updated_at": "2024-01-31T12:00:00Z",
            "coach_id": "cch123",
            "exercise": [{ "name": "Sprints" }],
            "player_training_plan": [{
                "start_date": "2024-02-01",
                "end_date": "2024-02-30",
                "created_at": "2024-01-31T12:00:00Z",
                "updated_at": "2024-01-31T12:00:00Z",
                "player_id": "ply1",
                "training_plan_id": "tpl1"
            }]
        });

        let errors = training_plan().validate(&plan).unwrap_err();
        assert!(errors.contains("exercise[0].duration"));
        assert!(errors.contains("exercise[0].training_plan_id"));
        assert!(errors.contains("player_training_plan[0].end_date"));
        assert!(!errors.contains("player_training_plan[0].start_date"));
        assert_eq!(errors.get("coach_id"), Some("coach_id must be a `coach` id"));
        assert_eq!(
            errors.get("player_training_plan[0].player_id"),
            Some("player_training_plan[0].player_id must be a `player` id")
        );
    }

    #[test]
    fn relation_fields_name_their_entity() {
        assert_eq!(
            player_performance().rule("player_id").unwrap().references(),
            Some("player")
        );
        assert_eq!(team().rule("name").unwrap().references(), None);
    }
}
