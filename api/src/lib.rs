#[macro_use]
pub mod crud_helpers;

pub mod api_key;
pub mod auth;
pub mod config;
pub mod error;
pub mod obfuscate_errors;
pub mod panic_handler;
pub mod routes;
pub mod shared_state;
pub mod tracing_config;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use academy_db::PoolExt;
use axum::{routing::IntoMakeService, Router};
use hyper::server::conn::AddrIncoming;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{event, Level};

pub use crate::{crud_helpers::Page, error::Error};
use crate::{
    auth::auth_layer,
    obfuscate_errors::ObfuscateErrorLayer,
    shared_state::{AppState, InnerState},
};

pub struct Server {
    pub host: String,
    pub port: u16,
    pub server: axum::Server<AddrIncoming, IntoMakeService<Router>>,
}

impl Server {
    pub async fn run(self) -> Result<(), Error> {
        self.server.await?;
        Ok(())
    }
}

/// The routes with every global middleware applied, outermost first.
pub fn app(state: AppState) -> Router {
    let production = state.production;
    let middleware = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(move |err| {
            panic_handler::handle_panic(production, err)
        }))
        .layer(ObfuscateErrorLayer::new(production))
        .compression()
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(auth_layer(state.db.clone()))
        .into_inner();

    routes::configure_routes()
        .layer(middleware)
        .with_state(state)
}

pub async fn create_server(config: config::Config) -> Result<Server, anyhow::Error> {
    let db = academy_db::connect(config.database_url.as_str(), config.db_connections)?;

    if config.migrate {
        let applied = db
            .interact(|conn| {
                academy_db::run_migrations(conn).map_err(|e| Error::Generic(anyhow::anyhow!(e)))
            })
            .await?;
        event!(Level::INFO, count = applied.len(), "Applied migrations");
    }

    let state = Arc::new(InnerState {
        production: config.production(),
        db,
    });

    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));
    let server = axum::Server::try_bind(&addr)?.serve(app(state).into_make_service());
    let port = server.local_addr().port();
    event!(Level::INFO, "Listening on {}:{}", config.host, port);

    Ok(Server {
        host: config.host,
        port,
        server,
    })
}
