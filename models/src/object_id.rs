use std::{borrow::Cow, ops::Deref, str::FromStr};

use base64::{display::Base64Display, engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;
use uuid::Uuid;

use crate::EntityKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("Invalid ID prefix, expected {0}")]
    InvalidPrefix(&'static str),

    #[error("Failed to decode object ID")]
    DecodeFailure,
}

/// A UUID tagged with the entity it identifies. `KIND` indexes [EntityKind::ALL].
///
/// The string form is a three letter prefix followed by the unpadded url-safe
/// base64 of the UUID bytes, e.g. `tem` + 22 characters for a team.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "diesel", derive(diesel::AsExpression, diesel::FromSqlRow))]
#[cfg_attr(feature = "diesel", diesel(sql_type = diesel::sql_types::Uuid))]
pub struct ObjectId<const KIND: usize>(pub Uuid);

pub type AcademyId = ObjectId<0>;
pub type TeamId = ObjectId<1>;
pub type CoachId = ObjectId<2>;
pub type PlayerId = ObjectId<3>;
pub type TrainingPlanId = ObjectId<4>;
pub type ExerciseId = ObjectId<5>;
pub type PlayerTrainingPlanId = ObjectId<6>;
pub type PlayerPerformanceId = ObjectId<7>;

/// Generate a new time-ordered UUID.
pub fn new_uuid() -> Uuid {
    ulid::Ulid::new().into()
}

impl EntityKind {
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Self::Academy => "acd",
            Self::Team => "tem",
            Self::Coach => "cch",
            Self::Player => "ply",
            Self::TrainingPlan => "tpl",
            Self::Exercise => "exr",
            Self::PlayerTrainingPlan => "ptp",
            Self::PlayerPerformance => "ppf",
        }
    }
}

impl<const KIND: usize> ObjectId<KIND> {
    pub const ENTITY: EntityKind = EntityKind::ALL[KIND];

    pub fn new() -> Self {
        Self(new_uuid())
    }

    fn parse_prefixed(encoded: &str) -> Result<Uuid, ObjectIdError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| ObjectIdError::DecodeFailure)?;
        Uuid::from_slice(&bytes).map_err(|_| ObjectIdError::DecodeFailure)
    }
}

impl<const KIND: usize> Default for ObjectId<KIND> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const KIND: usize> Deref for ObjectId<KIND> {
    type Target = Uuid;

    fn deref(&self) -> &Uuid {
        &self.0
    }
}

impl<const KIND: usize> From<Uuid> for ObjectId<KIND> {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl<const KIND: usize> From<ObjectId<KIND>> for Uuid {
    fn from(id: ObjectId<KIND>) -> Uuid {
        id.0
    }
}

impl<const KIND: usize> std::fmt::Debug for ObjectId<KIND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl<const KIND: usize> std::fmt::Display for ObjectId<KIND> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = Base64Display::new(self.0.as_bytes(), &URL_SAFE_NO_PAD);
        write!(f, "{}{encoded}", Self::ENTITY.id_prefix())
    }
}

impl<const KIND: usize> FromStr for ObjectId<KIND> {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prefix = Self::ENTITY.id_prefix();
        if let Some(encoded) = s.strip_prefix(prefix) {
            return Self::parse_prefixed(encoded).map(Self);
        }

        // Bare UUIDs, as stored in the database, are accepted too.
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| ObjectIdError::InvalidPrefix(prefix))
    }
}

impl<const KIND: usize> serde::Serialize for ObjectId<KIND> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const KIND: usize> serde::Deserialize<'de> for ObjectId<KIND> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&s),
                &Self::ENTITY.id_prefix(),
            )
        })
    }
}

#[cfg(feature = "diesel")]
mod sql {
    use diesel::{
        deserialize::{self, FromSql},
        pg::{Pg, PgValue},
        serialize::{self, Output, ToSql},
        sql_types,
    };
    use uuid::Uuid;

    use super::ObjectId;

    impl<const KIND: usize> FromSql<sql_types::Uuid, Pg> for ObjectId<KIND> {
        fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
            <Uuid as FromSql<sql_types::Uuid, Pg>>::from_sql(value).map(ObjectId)
        }
    }

    impl<const KIND: usize> ToSql<sql_types::Uuid, Pg> for ObjectId<KIND> {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
            <Uuid as ToSql<sql_types::Uuid, Pg>>::to_sql(&self.0, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form() {
        let id = TeamId::new();

        let s = id.to_string();
        assert!(s.starts_with("tem"));
        assert_eq!(s.len(), 3 + 22);
        assert_eq!(s.parse::<TeamId>().unwrap(), id);
    }

    #[test]
    fn kinds_line_up_with_aliases() {
        assert_eq!(AcademyId::ENTITY, EntityKind::Academy);
        assert_eq!(PlayerTrainingPlanId::ENTITY, EntityKind::PlayerTrainingPlan);
        assert_eq!(PlayerPerformanceId::ENTITY, EntityKind::PlayerPerformance);
    }

    #[test]
    fn accepts_plain_uuid() {
        let id = PlayerId::new();
        let parsed = PlayerId::from_str(&id.0.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_other_prefix() {
        let coach = CoachId::new().to_string();
        assert_eq!(
            PlayerId::from_str(&coach).unwrap_err(),
            ObjectIdError::InvalidPrefix("ply")
        );
        assert_eq!(
            PlayerId::from_str("ply!!").unwrap_err(),
            ObjectIdError::DecodeFailure
        );
    }

    #[test]
    fn json_is_a_plain_string() {
        let id = ExerciseId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
        assert_eq!(serde_json::from_value::<ExerciseId>(json).unwrap(), id);
        assert!(serde_json::from_str::<ExerciseId>("\"tem123\"").is_err());
    }
}
