use axum::Router;

use crate::shared_state::AppState;

mod academy;
mod coach;
mod exercise;
mod health;
mod player;
mod player_performance;
mod player_training_plan;
mod team;
mod training_plan;

pub fn configure_routes() -> Router<AppState> {
    Router::new()
        .merge(health::configure())
        .nest("/academies", academy::configure())
        .nest("/teams", team::configure())
        .nest("/coaches", coach::configure())
        .nest("/players", player::configure())
        .nest("/training-plans", training_plan::configure())
        .nest("/exercises", exercise::configure())
        .nest("/player-training-plans", player_training_plan::configure())
        .nest("/player-performances", player_performance::configure())
}
