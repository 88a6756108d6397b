use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    object_id::{PlayerId, PlayerPerformanceId},
    player::Player,
    Entity, EntityKind,
};

/// A player's statistics for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerPerformanceId>,
    pub game_date: NaiveDate,
    pub goals: i32,
    pub assists: i32,
    pub minutes_played: i32,
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Box<Player>>,
}

impl PlayerPerformance {
    pub fn new(player_id: PlayerId, game_date: NaiveDate) -> Self {
        let now = crate::now();
        PlayerPerformance {
            id: None,
            game_date,
            goals: 0,
            assists: 0,
            minutes_played: 0,
            player_id,
            created_at: Some(now),
            updated_at: Some(now),
            player: None,
        }
    }
}

impl Entity for PlayerPerformance {
    type Id = PlayerPerformanceId;
    const KIND: EntityKind = EntityKind::PlayerPerformance;

    fn id(&self) -> Option<PlayerPerformanceId> {
        self.id
    }
}
