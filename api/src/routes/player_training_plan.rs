use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    object_id::{PlayerId, PlayerTrainingPlanId, TrainingPlanId},
    player::Player,
    player_training_plan::PlayerTrainingPlan,
    training_plan::TrainingPlan,
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

type Row = academy_db::player_training_plans::PlayerTrainingPlan;
const ENTITY: &str = EntityKind::PlayerTrainingPlan.name();

fn load_relations(
    conn: &mut PgConnection,
    assignments: &mut [PlayerTrainingPlan],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    if include.has(EntityKind::Player) {
        let parent_ids = assignments.iter().map(|r| r.player_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            players,
            academy_db::players::Player,
            Player,
            parent_ids
        )?;
        for assignment in assignments.iter_mut() {
            assignment.player = parents.get(&assignment.player_id).cloned().map(Box::new);
        }
    }

    if include.has(EntityKind::TrainingPlan) {
        let parent_ids = assignments.iter().map(|r| r.training_plan_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            training_plans,
            academy_db::training_plans::TrainingPlan,
            TrainingPlan,
            parent_ids
        )?;
        for assignment in assignments.iter_mut() {
            assignment.training_plan =
                parents.get(&assignment.training_plan_id).cloned().map(Box::new);
        }
    }

    Ok(())
}

async fn list_player_training_plans(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(PlayerTrainingPlan::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, player_training_plans, Row, params)?;
            let mut data = rows.into_iter().map(PlayerTrainingPlan::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_player_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerTrainingPlanId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(PlayerTrainingPlan::KIND)?;

    let assignment = state
        .db
        .interact(move |conn| {
            let mut data =
                [PlayerTrainingPlan::from(get_object!(conn, player_training_plans, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [assignment] = data;
            Ok::<_, Error>(assignment)
        })
        .await?;

    Ok(Json(assignment))
}

async fn new_player_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value =
        Row::from_model(PlayerTrainingPlanId::new(), decode_body::<PlayerTrainingPlan>(body)?);

    let result = state
        .db
        .interact(move |conn| {
            create_object!(conn, player_training_plans, Row, value).map_err(Error::from)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PlayerTrainingPlan::from(result))))
}

async fn write_player_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerTrainingPlanId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<PlayerTrainingPlan>(body)?);

    let result = state
        .db
        .interact(move |conn| {
            write_object!(conn, player_training_plans, Row, id, value).map_err(Error::from)
        })
        .await?;

    Ok(Json(PlayerTrainingPlan::from(result)))
}

async fn delete_player_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<PlayerTrainingPlanId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, player_training_plans, id)
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
        .route("/", get(list_player_training_plans).post(new_player_training_plan))
        .route(
            "/:id",
            get(get_player_training_plan)
                .put(write_player_training_plan)
                .delete(delete_player_training_plan),
        )
}
