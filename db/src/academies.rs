use academy_models::academy::Academy as AcademyModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::AcademyId;

pub use crate::schema::academies::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::academies)]
#[diesel(treat_none_as_null = true)]
pub struct Academy {
    pub id: AcademyId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Academy {
    pub fn from_model(row_id: AcademyId, model: AcademyModel) -> Self {
        let now = academy_models::now();
        Academy {
            id: row_id,
            name: model.name,
            description: model.description,
            user_id: model.user_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<Academy> for AcademyModel {
    fn from(row: Academy) -> Self {
        AcademyModel {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            user_id: row.user_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            team: None,
            count: None,
        }
    }
}
