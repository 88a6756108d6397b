use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    object_id::{ExerciseId, TrainingPlanId},
    training_plan::TrainingPlan,
    Entity, EntityKind,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExerciseId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Duration in minutes.
    pub duration: i32,
    pub training_plan_id: TrainingPlanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan: Option<Box<TrainingPlan>>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, duration: i32, training_plan_id: TrainingPlanId) -> Self {
        let now = crate::now();
        Exercise {
            id: None,
            name: name.into(),
            description: None,
            duration,
            training_plan_id,
            created_at: Some(now),
            updated_at: Some(now),
            training_plan: None,
        }
    }
}

impl Entity for Exercise {
    type Id = ExerciseId;
    const KIND: EntityKind = EntityKind::Exercise;

    fn id(&self) -> Option<ExerciseId> {
        self.id
    }
}
