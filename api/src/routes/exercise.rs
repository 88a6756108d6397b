use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    exercise::Exercise,
    object_id::{ExerciseId, TrainingPlanId},
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

type Row = academy_db::exercises::Exercise;
const ENTITY: &str = EntityKind::Exercise.name();

fn load_relations(
    conn: &mut PgConnection,
    exercises: &mut [Exercise],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    if include.has(EntityKind::TrainingPlan) {
        let parent_ids = exercises.iter().map(|r| r.training_plan_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            training_plans,
            academy_db::training_plans::TrainingPlan,
            TrainingPlan,
            parent_ids
        )?;
        for exercise in exercises.iter_mut() {
            exercise.training_plan = parents.get(&exercise.training_plan_id).cloned().map(Box::new);
        }
    }

    Ok(())
}

async fn list_exercises(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Exercise::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, exercises, Row, params, search = name)?;
            let mut data = rows.into_iter().map(Exercise::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_exercise(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<ExerciseId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Exercise::KIND)?;

    let exercise = state
        .db
        .interact(move |conn| {
            let mut data = [Exercise::from(get_object!(conn, exercises, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [exercise] = data;
            Ok::<_, Error>(exercise)
        })
        .await?;

    Ok(Json(exercise))
}

async fn new_exercise(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(ExerciseId::new(), decode_body::<Exercise>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, exercises, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(Exercise::from(result))))
}

async fn write_exercise(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<ExerciseId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<Exercise>(body)?);

    let result = state
        .db
        .interact(move |conn| write_object!(conn, exercises, Row, id, value).map_err(Error::from))
        .await?;

    Ok(Json(Exercise::from(result)))
}

async fn delete_exercise(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<ExerciseId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, exercises, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises).post(new_exercise))
        .route(
            "/:id",
            get(get_exercise).put(write_exercise).delete(delete_exercise),
        )
}
