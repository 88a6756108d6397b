use academy_models::player::Player as PlayerModel;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::object_id::{PlayerId, TeamId};

pub use crate::schema::players::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::players)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: String,
    pub team_id: TeamId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn from_model(row_id: PlayerId, model: PlayerModel) -> Self {
        let now = academy_models::now();
        Player {
            id: row_id,
            user_id: model.user_id,
            team_id: model.team_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<Player> for PlayerModel {
    fn from(row: Player) -> Self {
        PlayerModel {
            id: Some(row.id),
            user_id: row.user_id,
            team_id: row.team_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            player_performance: None,
            player_training_plan: None,
            team: None,
            count: None,
        }
    }
}
