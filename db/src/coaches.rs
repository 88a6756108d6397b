use academy_models::coach::Coach as CoachModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::{CoachId, TeamId};

pub use crate::schema::coaches::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::coaches)]
pub struct Coach {
    pub id: CoachId,
    pub user_id: String,
    pub team_id: TeamId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coach {
    pub fn from_model(row_id: CoachId, model: CoachModel) -> Self {
        let now = academy_models::now();
        Coach {
            id: row_id,
            user_id: model.user_id,
            team_id: model.team_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<Coach> for CoachModel {
    fn from(row: Coach) -> Self {
        CoachModel {
            id: Some(row.id),
            user_id: row.user_id,
            team_id: row.team_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            training_plan: None,
            team: None,
            count: None,
        }
    }
}
