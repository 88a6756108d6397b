use academy_models::team::Team as TeamModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::{AcademyId, TeamId};

pub use crate::schema::teams::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::teams)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub academy_id: AcademyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn from_model(row_id: TeamId, model: TeamModel) -> Self {
        let now = academy_models::now();
        Team {
            id: row_id,
            name: model.name,
            academy_id: model.academy_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<Team> for TeamModel {
    fn from(row: Team) -> Self {
        TeamModel {
            id: Some(row.id),
            name: row.name,
            academy_id: row.academy_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            coach: None,
            player: None,
            academy: None,
            count: None,
        }
    }
}
