use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    coach::{Coach, CoachCount},
    object_id::{CoachId, TeamId},
    team::Team,
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
    crud_helpers::{count_of, decode_body, GetParams, Include, ListParams, Page},
    shared_state::AppState,
    Error,
};

type Row = academy_db::coaches::Coach;
const ENTITY: &str = EntityKind::Coach.name();

fn load_relations(
    conn: &mut PgConnection,
    coaches: &mut [Coach],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    let ids = coaches.iter().filter_map(|r| r.id).collect::<Vec<_>>();

    if include.has(EntityKind::Team) {
        let parent_ids = coaches.iter().map(|r| r.team_id).collect::<Vec<_>>();
        let parents = load_parents!(
            conn,
            teams,
            academy_db::teams::Team,
            Team,
            parent_ids
        )?;
        for coach in coaches.iter_mut() {
            coach.team = parents.get(&coach.team_id).cloned().map(Box::new);
        }
    }

    if include.has(EntityKind::TrainingPlan) {
        let mut children = load_children!(
            conn,
            training_plans,
            academy_db::training_plans::TrainingPlan,
            TrainingPlan,
            coach_id,
            ids.clone()
        )?;
        for coach in coaches.iter_mut() {
            coach.training_plan =
                Some(coach.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.count {
        let training_plans = count_children!(conn, training_plans, coach_id: CoachId, ids.clone())?;
        for coach in coaches.iter_mut() {
            coach.count = Some(CoachCount {
                training_plan: count_of(&training_plans, coach.id),
            });
        }
    }

    Ok(())
}

async fn list_coaches(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Coach::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, coaches, Row, params, search = user_id)?;
            let mut data = rows.into_iter().map(Coach::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_coach(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<CoachId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Coach::KIND)?;

    let coach = state
        .db
        .interact(move |conn| {
            let mut data = [Coach::from(get_object!(conn, coaches, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [coach] = data;
            Ok::<_, Error>(coach)
        })
        .await?;

    Ok(Json(coach))
}

async fn new_coach(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(CoachId::new(), decode_body::<Coach>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, coaches, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(Coach::from(result))))
}

async fn write_coach(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<CoachId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<Coach>(body)?);

    let result = state
        .db
        .interact(move |conn| write_object!(conn, coaches, Row, id, value).map_err(Error::from))
        .await?;

    Ok(Json(Coach::from(result)))
}

async fn delete_coach(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<CoachId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, coaches, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coaches).post(new_coach))
        .route(
            "/:id",
            get(get_coach).put(write_coach).delete(delete_coach),
        )
}
