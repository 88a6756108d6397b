use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    coach::Coach,
    exercise::Exercise,
    object_id::{CoachId, TrainingPlanId},
    player_training_plan::PlayerTrainingPlan,
    training_plan::{TrainingPlan, TrainingPlanCount},
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

type Row = academy_db::training_plans::TrainingPlan;
const ENTITY: &str = EntityKind::TrainingPlan.name();

fn load_relations(
    conn: &mut PgConnection,
    plans: &mut [TrainingPlan],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    let ids = plans.iter().filter_map(|r| r.id).collect::<Vec<_>>();

    if include.has(EntityKind::Coach) {
        let parent_ids = plans.iter().map(|r| r.coach_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            coaches,
            academy_db::coaches::Coach,
            Coach,
            parent_ids
        )?;
        for plan in plans.iter_mut() {
            plan.coach = parents.get(&plan.coach_id).cloned().map(Box::new);
        }
    }

    if include.has(EntityKind::Exercise) {
        let mut children = load_children!(
            conn,
            exercises,
            academy_db::exercises::Exercise,
            Exercise,
            training_plan_id,
            ids.clone()
        )?;
        for plan in plans.iter_mut() {
            plan.exercise = Some(plan.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.has(EntityKind::PlayerTrainingPlan) {
        let mut children = load_children!(
            conn,
            player_training_plans,
            academy_db::player_training_plans::PlayerTrainingPlan,
            PlayerTrainingPlan,
            training_plan_id,
            ids.clone()
        )?;
        for plan in plans.iter_mut() {
            plan.player_training_plan =
                Some(plan.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.count {
        let exercises =
            count_children!(conn, exercises, training_plan_id: TrainingPlanId, ids.clone())?;
        let player_training_plans = count_children!(
            conn,
            player_training_plans,
            training_plan_id: TrainingPlanId,
            ids.clone()
        )?;
        for plan in plans.iter_mut() {
            plan.count = Some(TrainingPlanCount {
                exercise: count_of(&exercises, plan.id),
                player_training_plan: count_of(&player_training_plans, plan.id),
            });
        }
    }

    Ok(())
}

async fn list_training_plans(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(TrainingPlan::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, training_plans, Row, params, search = name)?;
            let mut data = rows.into_iter().map(TrainingPlan::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TrainingPlanId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(TrainingPlan::KIND)?;

    let plan = state
        .db
        .interact(move |conn| {
            let mut data = [TrainingPlan::from(get_object!(conn, training_plans, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [plan] = data;
            Ok::<_, Error>(plan)
        })
        .await?;

    Ok(Json(plan))
}

async fn new_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(TrainingPlanId::new(), decode_body::<TrainingPlan>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, training_plans, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(TrainingPlan::from(result))))
}

async fn write_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TrainingPlanId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<TrainingPlan>(body)?);

    let result = state
        .db
        .interact(move |conn| {
            write_object!(conn, training_plans, Row, id, value).map_err(Error::from)
        })
        .await?;

    Ok(Json(TrainingPlan::from(result)))
}

async fn delete_training_plan(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<TrainingPlanId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, training_plans, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_training_plans).post(new_training_plan))
        .route(
            "/:id",
            get(get_training_plan).put(write_training_plan).delete(delete_training_plan),
        )
}
