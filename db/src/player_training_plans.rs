use academy_models::player_training_plan::PlayerTrainingPlan as PlayerTrainingPlanModel;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::object_id::{PlayerId, PlayerTrainingPlanId, TrainingPlanId};

pub use crate::schema::player_training_plans::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::player_training_plans)]
pub struct PlayerTrainingPlan {
    pub id: PlayerTrainingPlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub player_id: PlayerId,
    pub training_plan_id: TrainingPlanId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerTrainingPlan {
    pub fn from_model(row_id: PlayerTrainingPlanId, model: PlayerTrainingPlanModel) -> Self {
        let now = academy_models::now();
        PlayerTrainingPlan {
            id: row_id,
            start_date: model.start_date,
            end_date: model.end_date,
            player_id: model.player_id,
            training_plan_id: model.training_plan_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<PlayerTrainingPlan> for PlayerTrainingPlanModel {
    fn from(row: PlayerTrainingPlan) -> Self {
        PlayerTrainingPlanModel {
            id: Some(row.id),
            start_date: row.start_date,
            end_date: row.end_date,
            player_id: row.player_id,
            training_plan_id: row.training_plan_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            player: None,
            training_plan: None,
        }
    }
}
