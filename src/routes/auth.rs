use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/api/users", post(handlers::signup))
        .route("/api/users/login", post(handlers::login))
        .route("/api/users/logout", post(handlers::logout))
}
