use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    academy::Academy,
    coach::Coach,
    object_id::{AcademyId, TeamId},
    player::Player,
    Entity, EntityKind,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TeamId>,
    pub name: String,
    pub academy_id: AcademyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<Vec<Coach>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Vec<Player>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy: Option<Box<Academy>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<TeamCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<i64>,
}

impl Team {
    pub fn new(name: impl Into<String>, academy_id: AcademyId) -> Self {
        let now = crate::now();
        Team {
            id: None,
            name: name.into(),
            academy_id,
            created_at: Some(now),
            updated_at: Some(now),
            coach: None,
            player: None,
            academy: None,
            count: None,
        }
    }
}

impl Entity for Team {
    type Id = TeamId;
    const KIND: EntityKind = EntityKind::Team;

    fn id(&self) -> Option<TeamId> {
        self.id
    }
}
