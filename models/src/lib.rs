mod entity;

pub mod academy;
pub mod coach;
pub mod exercise;
pub mod object_id;
pub mod player;
pub mod player_performance;
pub mod player_training_plan;
pub mod team;
pub mod training_plan;

pub use entity::*;

use chrono::{DateTime, SubsecRound, Utc};

/// The current time at the precision the database stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        object_id::{AcademyId, PlayerId, TeamId},
        player_performance::PlayerPerformance,
        team::{Team, TeamCount},
    };

    #[test]
    fn team_wire_format() {
        let academy_id = AcademyId::new();
        let mut team = Team::new("U12 Falcons", academy_id);
        team.id = Some(TeamId::new());
        team.count = Some(TeamCount {
            coach: Some(1),
            player: Some(14),
        });

        let value = serde_json::to_value(&team).unwrap();
        assert_eq!(value["academy_id"], json!(academy_id.to_string()));
        assert_eq!(value["_count"], json!({ "coach": 1, "player": 14 }));
        assert!(value.get("coach").is_none(), "unloaded relations are omitted");

        let back: Team = serde_json::from_value(value).unwrap();
        assert_eq!(back, team);
    }

    #[test]
    fn serialized_records_pass_their_schema() {
        let record = PlayerPerformance::new(
            PlayerId::new(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["game_date"], json!("2024-03-09"));
        assert_eq!(
            <PlayerPerformance as Entity>::schema().validate(&value),
            Ok(())
        );

        let team = serde_json::to_value(Team::new("Falcons", AcademyId::new())).unwrap();
        assert_eq!(<Team as Entity>::schema().validate(&team), Ok(()));
    }
}
