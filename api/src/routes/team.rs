use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    academy::Academy,
    coach::Coach,
    object_id::TeamId,
    player::Player,
    team::{Team, TeamCount},
    Entity, EntityKind,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use diesel::{prelude::*, PgConnection};
use serde_json::json;

use crate::{
    auth::UserInfo,
    crud_helpers::{count_of, decode_body, GetParams, Include, ListParams, Page},
    shared_state::AppState,
    Error,
};

type Row = academy_db::teams::Team;
const ENTITY: &str = EntityKind::Team.name();

fn load_relations(
    conn: &mut PgConnection,
    teams: &mut [Team],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    let ids = teams.iter().filter_map(|t| t.id).collect::<Vec<_>>();

    if include.has(EntityKind::Academy) {
        let parent_ids = teams.iter().map(|t| t.academy_id).collect::<Vec<_>>();
        let academies = load_parents!(
            conn,
            academies,
            academy_db::academies::Academy,
            Academy,
            parent_ids
        )?;
        for team in teams.iter_mut() {
            team.academy = academies.get(&team.academy_id).cloned().map(Box::new);
        }
    }

    if include.has(EntityKind::Coach) {
        let mut coaches = load_children!(
            conn,
            coaches,
            academy_db::coaches::Coach,
            Coach,
            team_id,
            ids.clone()
        )?;
        for team in teams.iter_mut() {
            team.coach = Some(team.id.and_then(|id| coaches.remove(&id)).unwrap_or_default());
        }
    }

    if include.has(EntityKind::Player) {
        let mut players = load_children!(
            conn,
            players,
            academy_db::players::Player,
            Player,
            team_id,
            ids.clone()
        )?;
        for team in teams.iter_mut() {
            team.player = Some(team.id.and_then(|id| players.remove(&id)).unwrap_or_default());
        }
    }

    if include.count {
        let coaches = count_children!(conn, coaches, team_id: TeamId, ids.clone())?;
        let players = count_children!(conn, players, team_id: TeamId, ids)?;
        for team in teams.iter_mut() {
            team.count = Some(TeamCount {
                coach: count_of(&coaches, team.id),
                player: count_of(&players, team.id),
            });
        }
    }

    Ok(())
}

async fn list_teams(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Team::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, teams, Row, params, search = name)?;
            let mut data = rows.into_iter().map(Team::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_team(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TeamId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Team::KIND)?;

    let team = state
        .db
        .interact(move |conn| {
            let mut data = [Team::from(get_object!(conn, teams, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [team] = data;
            Ok::<_, Error>(team)
        })
        .await?;

    Ok(Json(team))
}

async fn new_team(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(TeamId::new(), decode_body::<Team>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, teams, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(Team::from(result))))
}

async fn write_team(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TeamId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<Team>(body)?);

    let result = state
        .db
        .interact(move |conn| write_object!(conn, teams, Row, id, value).map_err(Error::from))
        .await?;

    Ok(Json(Team::from(result)))
}

async fn delete_team(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TeamId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, teams, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(new_team))
        .route("/:id", get(get_team).put(write_team).delete(delete_team))
}
