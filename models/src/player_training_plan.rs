use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    object_id::{PlayerId, PlayerTrainingPlanId, TrainingPlanId},
    player::Player,
    training_plan::TrainingPlan,
    Entity, EntityKind,
};

/// Assignment of a training plan to a player for a date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrainingPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerTrainingPlanId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub player_id: PlayerId,
    pub training_plan_id: TrainingPlanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Box<Player>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan: Option<Box<TrainingPlan>>,
}

impl PlayerTrainingPlan {
    pub fn new(
        player_id: PlayerId,
        training_plan_id: TrainingPlanId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = crate::now();
        PlayerTrainingPlan {
            id: None,
            start_date,
            end_date,
            player_id,
            training_plan_id,
            created_at: Some(now),
            updated_at: Some(now),
            player: None,
            training_plan: None,
        }
    }
}

impl Entity for PlayerTrainingPlan {
    type Id = PlayerTrainingPlanId;
    const KIND: EntityKind = EntityKind::PlayerTrainingPlan;

    fn id(&self) -> Option<PlayerTrainingPlanId> {
        self.id
    }
}
