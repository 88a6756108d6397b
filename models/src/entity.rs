use std::{fmt::Debug, fmt::Display, hash::Hash, str::FromStr};

use academy_validation::{schemas, ObjectSchema};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A record type served by the REST API.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type Id: Copy
        + Eq
        + Hash
        + Debug
        + Display
        + FromStr
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    const KIND: EntityKind;

    /// The record's id, which is unset until the server has created it.
    fn id(&self) -> Option<Self::Id>;

    fn schema() -> &'static ObjectSchema {
        Self::KIND.schema()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Academy,
    Team,
    Coach,
    Player,
    TrainingPlan,
    Exercise,
    PlayerTrainingPlan,
    PlayerPerformance,
}

/// A belongs-to link from an entity to its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParentRelation {
    /// The foreign key column on the child.
    pub field: &'static str,
    pub entity: EntityKind,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Academy,
        EntityKind::Team,
        EntityKind::Coach,
        EntityKind::Player,
        EntityKind::TrainingPlan,
        EntityKind::Exercise,
        EntityKind::PlayerTrainingPlan,
        EntityKind::PlayerPerformance,
    ];

    /// The name used in access-control triples and as a relation name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Academy => "academy",
            Self::Team => "team",
            Self::Coach => "coach",
            Self::Player => "player",
            Self::TrainingPlan => "training_plan",
            Self::Exercise => "exercise",
            Self::PlayerTrainingPlan => "player_training_plan",
            Self::PlayerPerformance => "player_performance",
        }
    }

    /// The resource path segment of the REST API.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Academy => "academies",
            Self::Team => "teams",
            Self::Coach => "coaches",
            Self::Player => "players",
            Self::TrainingPlan => "training-plans",
            Self::Exercise => "exercises",
            Self::PlayerTrainingPlan => "player-training-plans",
            Self::PlayerPerformance => "player-performances",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Academy => "Academy",
            Self::Team => "Team",
            Self::Coach => "Coach",
            Self::Player => "Player",
            Self::TrainingPlan => "Training Plan",
            Self::Exercise => "Exercise",
            Self::PlayerTrainingPlan => "Player Training Plan",
            Self::PlayerPerformance => "Player Performance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn schema(&self) -> &'static ObjectSchema {
        match self {
            Self::Academy => schemas::academy(),
            Self::Team => schemas::team(),
            Self::Coach => schemas::coach(),
            Self::Player => schemas::player(),
            Self::TrainingPlan => schemas::training_plan(),
            Self::Exercise => schemas::exercise(),
            Self::PlayerTrainingPlan => schemas::player_training_plan(),
            Self::PlayerPerformance => schemas::player_performance(),
        }
    }

    pub fn parents(&self) -> &'static [ParentRelation] {
        match self {
            Self::Academy => &[],
            Self::Team => &[ParentRelation {
                field: "academy_id",
                entity: EntityKind::Academy,
            }],
            Self::Coach | Self::Player => &[ParentRelation {
                field: "team_id",
                entity: EntityKind::Team,
            }],
            Self::TrainingPlan => &[ParentRelation {
                field: "coach_id",
                entity: EntityKind::Coach,
            }],
            Self::Exercise => &[ParentRelation {
                field: "training_plan_id",
                entity: EntityKind::TrainingPlan,
            }],
            Self::PlayerTrainingPlan => &[
                ParentRelation {
                    field: "player_id",
                    entity: EntityKind::Player,
                },
                ParentRelation {
                    field: "training_plan_id",
                    entity: EntityKind::TrainingPlan,
                },
            ],
            Self::PlayerPerformance => &[ParentRelation {
                field: "player_id",
                entity: EntityKind::Player,
            }],
        }
    }

    pub fn children(&self) -> &'static [EntityKind] {
        match self {
            Self::Academy => &[EntityKind::Team],
            Self::Team => &[EntityKind::Coach, EntityKind::Player],
            Self::Coach => &[EntityKind::TrainingPlan],
            Self::Player => &[EntityKind::PlayerPerformance, EntityKind::PlayerTrainingPlan],
            Self::TrainingPlan => &[EntityKind::Exercise, EntityKind::PlayerTrainingPlan],
            Self::Exercise | Self::PlayerTrainingPlan | Self::PlayerPerformance => &[],
        }
    }

    /// True if `name` is a parent or child relation of this entity.
    pub fn has_relation(&self, name: &str) -> bool {
        self.parents().iter().any(|p| p.entity.name() == name)
            || self.children().iter().any(|c| c.name() == name)
    }

    /// The text column used for searching and for labelling records in relation selectors.
    pub fn display_field(&self) -> Option<&'static str> {
        match self {
            Self::Academy | Self::Team | Self::TrainingPlan | Self::Exercise => Some("name"),
            Self::Coach | Self::Player => Some("user_id"),
            Self::PlayerTrainingPlan | Self::PlayerPerformance => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.schema().entity, kind.name());
        }
    }

    #[test]
    fn parent_fields_are_schema_references() {
        for kind in EntityKind::ALL {
            for parent in kind.parents() {
                let rule = kind.schema().rule(parent.field).expect(parent.field);
                assert_eq!(rule.references(), Some(parent.entity.name()));
                assert!(
                    matches!(
                        rule.kind,
                        academy_validation::FieldKind::Reference { prefix, .. }
                            if prefix == parent.entity.id_prefix()
                    ),
                    "{kind}.{} should use the {} prefix",
                    parent.field,
                    parent.entity.id_prefix()
                );
            }
        }
    }

    #[test]
    fn children_point_back_at_parent() {
        for kind in EntityKind::ALL {
            for child in kind.children() {
                assert!(
                    child.parents().iter().any(|p| p.entity == kind),
                    "{child} should belong to {kind}"
                );
            }
        }
    }

    #[test]
    fn relations() {
        assert!(EntityKind::Team.has_relation("academy"));
        assert!(EntityKind::Team.has_relation("player"));
        assert!(!EntityKind::Team.has_relation("exercise"));
    }
}
