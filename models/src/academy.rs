use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{object_id::AcademyId, team::Team, Entity, EntityKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Academy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AcademyId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The owning user in the access-control service.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<Team>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<AcademyCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademyCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<i64>,
}

impl Academy {
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = crate::now();
        Academy {
            id: None,
            name: name.into(),
            description: None,
            user_id: user_id.into(),
            created_at: Some(now),
            updated_at: Some(now),
            team: None,
            count: None,
        }
    }
}

impl Entity for Academy {
    type Id = AcademyId;
    const KIND: EntityKind = EntityKind::Academy;

    fn id(&self) -> Option<AcademyId> {
        self.id
    }
}
