use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    coach::Coach,
    exercise::Exercise,
    object_id::{CoachId, TrainingPlanId},
    player_training_plan::PlayerTrainingPlan,
    Entity, EntityKind,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TrainingPlanId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coach_id: CoachId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Vec<Exercise>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_training_plan: Option<Vec<PlayerTrainingPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<Box<Coach>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<TrainingPlanCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlanCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_training_plan: Option<i64>,
}

impl TrainingPlan {
    pub fn new(name: impl Into<String>, coach_id: CoachId) -> Self {
        let now = crate::now();
        TrainingPlan {
            id: None,
            name: name.into(),
            description: None,
            coach_id,
            created_at: Some(now),
            updated_at: Some(now),
            exercise: None,
            player_training_plan: None,
            coach: None,
            count: None,
        }
    }
}

impl Entity for TrainingPlan {
    type Id = TrainingPlanId;
    const KIND: EntityKind = EntityKind::TrainingPlan;

    fn id(&self) -> Option<TrainingPlanId> {
        self.id
    }
}
