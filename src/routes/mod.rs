pub mod auth;
pub mod characters;
pub mod game;
pub mod home;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: pages plus the JSON API.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(characters::router())
        .merge(game::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
