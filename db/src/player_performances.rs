use academy_models::player_performance::PlayerPerformance as PlayerPerformanceModel;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::object_id::{PlayerId, PlayerPerformanceId};

pub use crate::schema::player_performances::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::player_performances)]
pub struct PlayerPerformance {
    pub id: PlayerPerformanceId,
    pub game_date: NaiveDate,
    pub goals: i32,
    pub assists: i32,
    pub minutes_played: i32,
    pub player_id: PlayerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerPerformance {
    pub fn from_model(row_id: PlayerPerformanceId, model: PlayerPerformanceModel) -> Self {
        let now = academy_models::now();
        PlayerPerformance {
            id: row_id,
            game_date: model.game_date,
            goals: model.goals,
            assists: model.assists,
            minutes_played: model.minutes_played,
            player_id: model.player_id,
            created_at: model.created_at.unwrap_or(now),
            updated_at: model.updated_at.unwrap_or(now),
        }
    }
}

impl From<PlayerPerformance> for PlayerPerformanceModel {
    fn from(row: PlayerPerformance) -> Self {
        PlayerPerformanceModel {
            id: Some(row.id),
            game_date: row.game_date,
            goals: row.goals,
            assists: row.assists,
            minutes_played: row.minutes_played,
            player_id: row.player_id,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            player: None,
        }
    }
}
