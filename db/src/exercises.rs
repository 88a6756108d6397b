use academy_models::exercise::Exercise as ExerciseModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::{ExerciseId, TrainingPlanId};

pub use crate::schema::exercises::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::exercises)]
#[diesel(treat_none_as_null = true)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    pub duration: i32,
    pub training_plan_id: TrainingPlanId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    pub fn from_model(row_id: ExerciseId, model: ExerciseModel) -> Self {
        let now = academy_models::now();
        Exercise {
            id: row_id,
            name: model.name,
            description: model.description,
            duration: model.duration,
            training_plan_id: model.training_plan_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<Exercise> for ExerciseModel {
    fn from(row: Exercise) -> Self {
        ExerciseModel {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            duration: row.duration,
            training_plan_id: row.training_plan_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            training_plan: None,
        }
    }
}
