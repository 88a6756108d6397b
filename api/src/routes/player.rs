use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    object_id::{PlayerId, TeamId},
    player::{Player, PlayerCount},
    player_performance::PlayerPerformance,
    player_training_plan::PlayerTrainingPlan,
    team::Team,
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

type Row = academy_db::players::Player;
const ENTITY: &str = EntityKind::Player.name();

fn load_relations(
    conn: &mut PgConnection,
    players: &mut [Player],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    let ids = players.iter().filter_map(|r| r.id).collect::<Vec<_>>();

    if include.has(EntityKind::Team) {
        let parent_ids = players.iter().map(|r| r.team_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            teams,
            academy_db::teams::Team,
            Team,
            parent_ids
        )?;
        for player in players.iter_mut() {
            player.team = parents.get(&player.team_id).cloned().map(Box::new);
        }
    }

    if include.has(EntityKind::PlayerPerformance) {
        let mut children = load_children!(
            conn,
            player_performances,
            academy_db::player_performances::PlayerPerformance,
            PlayerPerformance,
            player_id,
            ids.clone()
        )?;
        for player in players.iter_mut() {
            player.player_performance =
                Some(player.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.has(EntityKind::PlayerTrainingPlan) {
        let mut children = load_children!(
            conn,
            player_training_plans,
            academy_db::player_training_plans::PlayerTrainingPlan,
            PlayerTrainingPlan,
            player_id,
            ids.clone()
        )?;
        for player in players.iter_mut() {
            player.player_training_plan =
                Some(player.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.count {
        let player_performances =
            count_children!(conn, player_performances, player_id: PlayerId, ids.clone())?;
        let player_training_plans =
            count_children!(conn, player_training_plans, player_id: PlayerId, ids.clone())?;
        for player in players.iter_mut() {
            player.count = Some(PlayerCount {
                player_performance: count_of(&player_performances, player.id),
                player_training_plan: count_of(&player_training_plans, player.id),
            });
        }
    }

    Ok(())
}

async fn list_players(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Player::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, players, Row, params, search = user_id)?;
            let mut data = rows.into_iter().map(Player::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_player(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Player::KIND)?;

    let player = state
        .db
        .interact(move |conn| {
            let mut data = [Player::from(get_object!(conn, players, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [player] = data;
            Ok::<_, Error>(player)
        })
        .await?;

    Ok(Json(player))
}

async fn new_player(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(PlayerId::new(), decode_body::<Player>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, players, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(Player::from(result))))
}

async fn write_player(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<Player>(body)?);

    let result = state
        .db
        .interact(move |conn| write_object!(conn, players, Row, id, value).map_err(Error::from))
        .await?;

    Ok(Json(Player::from(result)))
}

async fn delete_player(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, players, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_players).post(new_player))
        .route(
            "/:id",
            get(get_player).put(write_player).delete(delete_player),
        )
}
