use academy_auth::AccessOperation;
use academy_db::PoolExt;
use academy_models::{
    academy::{Academy, AcademyCount},
    object_id::AcademyId,
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

type Row = academy_db::academies::Academy;
const ENTITY: &str = EntityKind::Academy.name();

fn load_relations(
    conn: &mut PgConnection,
    academies: &mut [Academy],
    include: &Include,
) -> Result<(), Error> {
    if include.is_empty() {
        return Ok(());
    }

    let ids = academies.iter().filter_map(|r| r.id).collect::<Vec<_>>();

    if include.has(EntityKind::Team) {
        let mut children = load_children!(
            conn,
            teams,
            academy_db::teams::Team,
            Team,
            academy_id,
            ids.clone()
        )?;
        for academy in academies.iter_mut() {
            academy.team = Some(academy.id.and_then(|id| children.remove(&id)).unwrap_or_default());
        }
    }

    if include.count {
        let teams = count_children!(conn, teams, academy_id: AcademyId, ids.clone())?;
        for academy in academies.iter_mut() {
            academy.count = Some(AcademyCount {
                team: count_of(&teams, academy.id),
            });
        }
    }

    Ok(())
}

async fn list_academies(
    State(state): State<AppState>,
    user: UserInfo,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Academy::KIND)?;

    let page = state
        .db
        .interact(move |conn| {
            let (rows, total) = list_objects!(conn, academies, Row, params, search = name)?;
            let mut data = rows.into_iter().map(Academy::from).collect::<Vec<_>>();
            load_relations(conn, &mut data, &include)?;
            Ok::<_, Error>(Page::new(data, total))
        })
        .await?;

    Ok(Json(page))
}

async fn get_academy(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<AcademyId>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Read)?;
    let include = params.include(Academy::KIND)?;

    let academy = state
        .db
        .interact(move |conn| {
            let mut data = [Academy::from(get_object!(conn, academies, Row, id)?)];
            load_relations(conn, &mut data, &include)?;
            let [academy] = data;
            Ok::<_, Error>(academy)
        })
        .await?;

    Ok(Json(academy))
}

async fn new_academy(
    State(state): State<AppState>,
    user: UserInfo,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Create)?;
    let value = Row::from_model(AcademyId::new(), decode_body::<Academy>(body)?);

    let result = state
        .db
        .interact(move |conn| create_object!(conn, academies, Row, value).map_err(Error::from))
        .await?;

    Ok((StatusCode::CREATED, Json(Academy::from(result))))
}

async fn write_academy(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<AcademyId>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Update)?;
    let value = Row::from_model(id, decode_body::<Academy>(body)?);

    let result = state
        .db
        .interact(move |conn| write_object!(conn, academies, Row, id, value).map_err(Error::from))
        .await?;

    Ok(Json(Academy::from(result)))
}

async fn delete_academy(
    State(state): State<AppState>,
    user: UserInfo,
    Path(id): Path<AcademyId>,
) -> Result<impl IntoResponse, Error> {
    user.must_have_on(ENTITY, AccessOperation::Delete)?;

    let deleted = state
        .db
        .interact(move |conn| {
            delete_object!(conn, academies, id).map_err(|e| Error::from(e).on_delete(ENTITY))
        })
        .await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({})))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_academies).post(new_academy))
        .route(
            "/:id",
            get(get_academy).put(write_academy).delete(delete_academy),
        )
}
