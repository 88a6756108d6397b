use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    object_id::{PlayerId, TeamId},
    player_performance::PlayerPerformance,
    player_training_plan::PlayerTrainingPlan,
    team::Team,
    Entity, EntityKind,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,
    pub user_id: String,
    pub team_id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_performance: Option<Vec<PlayerPerformance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_training_plan: Option<Vec<PlayerTrainingPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Box<Team>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<PlayerCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_performance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_training_plan: Option<i64>,
}

impl Player {
    pub fn new(user_id: impl Into<String>, team_id: TeamId) -> Self {
        let now = crate::now();
        Player {
            id: None,
            user_id: user_id.into(),
            team_id,
            created_at: Some(now),
            updated_at: Some(now),
            player_performance: None,
            player_training_plan: None,
            team: None,
            count: None,
        }
    }
}

impl Entity for Player {
    type Id = PlayerId;
    const KIND: EntityKind = EntityKind::Player;

    fn id(&self) -> Option<PlayerId> {
        self.id
    }
}
