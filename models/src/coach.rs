use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    object_id::{CoachId, TeamId},
    team::Team,
    training_plan::TrainingPlan,
    Entity, EntityKind,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CoachId>,
    pub user_id: String,
    pub team_id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan: Option<Vec<TrainingPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Box<Team>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<CoachCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plan: Option<i64>,
}

impl Coach {
    pub fn new(user_id: impl Into<String>, team_id: TeamId) -> Self {
        let now = crate::now();
        Coach {
            id: None,
            user_id: user_id.into(),
            team_id,
            created_at: Some(now),
            updated_at: Some(now),
            training_plan: None,
            team: None,
            count: None,
        }
    }
}

impl Entity for Coach {
    type Id = CoachId;
    const KIND: EntityKind = EntityKind::Coach;

    fn id(&self) -> Option<CoachId> {
        self.id
    }
}
