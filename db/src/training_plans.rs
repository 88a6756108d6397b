use academy_models::training_plan::TrainingPlan as TrainingPlanModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::{CoachId, TrainingPlanId};

pub use crate::schema::training_plans::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::training_plans)]
#[diesel(treat_none_as_null = true)]
pub struct TrainingPlan {
    pub id: TrainingPlanId,
    pub name: String,
    pub description: Option<String>,
    pub coach_id: CoachId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrainingPlan {
    pub fn from_model(row_id: TrainingPlanId, model: TrainingPlanModel) -> Self {
        let now = academy_models::now();
        TrainingPlan {
            id: row_id,
            name: model.name,
            description: model.description,
            coach_id: model.coach_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<TrainingPlan> for TrainingPlanModel {
    fn from(row: TrainingPlan) -> Self {
        TrainingPlanModel {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            coach_id: row.coach_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            exercise: None,
            player_training_plan: None,
            coach: None,
            count: None,
        }
    }
}
