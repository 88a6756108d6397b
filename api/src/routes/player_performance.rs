use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    object_id::{PlayerId, PlayerPerformanceId},
    player::Player,
    player_performance::PlayerPerformance,
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
    crud_helpers::{decode_body, GetParams, Include, ListParams, Page},
    shared_state::AppState,
    Error,
};

type Row = academy_db::player_performances::PlayerPerformance;
const ENTITY: &str = EntityKind::PlayerPerformance.name();

fn load_relations(
    conn: &mut PgConnection,
    performances: &mut [PlayerPerformance],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    if include.has(EntityKind::Player) {
        let parent_ids = performances.iter().map(|r| r.player_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            players,
            academy_db::players::Player,
            Player,
            parent_ids
        )?;
        for performance in performances.iter_mut() {
            performance.player = parents.get(&performance.player_id).cloned().map(Box::new);
        }
    }

    Ok(())
}

async fn list_player_performances(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(PlayerPerformance::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, player_performances, Row, params)?;
            let mut data = rows.into_iter().map(PlayerPerformance::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_player_performance(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerPerformanceId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(PlayerPerformance::KIND)?;

    let performance = state
        .db
        .interact(move |conn| {
            let mut data =
                [PlayerPerformance::from(get_object!(conn, player_performances, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [performance] = data;
            Ok::<_, Error>(performance)
        })
        .await?;

    Ok(Json(performance))
}

async fn new_player_performance(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value =
        Row::from_model(PlayerPerformanceId::new(), decode_body::<PlayerPerformance>(body)?);

    let result = state
        .db
        .interact(move |conn| {
            create_object!(conn, player_performances, Row, value).map_err(Error::from)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PlayerPerformance::from(result))))
}

async fn write_player_performance(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerPerformanceId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<PlayerPerformance>(body)?);

    let result = state
        .db
        .interact(move |conn| {
            write_object!(conn, player_performances, Row, id, value).map_err(Error::from)
        })
        .await?;

    Ok(Json(PlayerPerformance::from(result)))
}

async fn delete_player_performance(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerPerformanceId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, player_performances, id)
                .map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_player_performances).post(new_player_performance))
        .route(
            "/:id",
            get(get_player_performance)
                .put(write_player_performance)
                .delete(delete_player_performance),
        )
}
