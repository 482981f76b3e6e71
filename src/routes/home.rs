use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::auth::users;
use crate::db::models::{Outcome, User};
use crate::error::AppResult;
use crate::extractors::RequestContext;
use crate::game::domain::ClassOption;
use crate::game::Genre;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub logged_in: bool,
    pub outcomes: Vec<Outcome>,
}

#[derive(Template)]
#[template(path = "pages/game.html")]
pub struct GameTemplate {
    pub logged_in: bool,
}

/// Genre with the classes it offers, for the creation form dropdowns.
pub struct GenreChoice {
    pub name: &'static str,
    pub classes: Vec<ClassOption>,
}

#[derive(Template)]
#[template(path = "pages/create.html")]
pub struct CreateTemplate {
    pub logged_in: bool,
    pub genres: Vec<GenreChoice>,
}

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub logged_in: bool,
    pub user: User,
    pub outcomes: Vec<Outcome>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/game", get(game))
        .route("/create", get(create))
        .route("/profile", get(profile))
}

/// GET / — landing page with the most recent outcomes
pub async fn index(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let outcomes = state.characters.latest_outcomes().await?;
    Ok(Html(HomeTemplate {
        logged_in: ctx.logged_in(),
        outcomes,
    })
    .into_response())
}

/// GET /game — reads the stored selection client-side
pub async fn game(ctx: RequestContext) -> Response {
    Html(GameTemplate {
        logged_in: ctx.logged_in(),
    })
    .into_response()
}

/// GET /create — two-step creation form
pub async fn create(ctx: RequestContext) -> Response {
    let genres = Genre::ALL
        .iter()
        .map(|genre| GenreChoice {
            name: genre.as_str(),
            classes: genre.class_options().to_vec(),
        })
        .collect();
    Html(CreateTemplate {
        logged_in: ctx.logged_in(),
        genres,
    })
    .into_response()
}

/// GET /profile — anonymous visitors are sent to the login page
pub async fn profile(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let Some(current) = ctx.user else {
        return Ok(Redirect::to("/login").into_response());
    };
    let Some(user) = users::find_by_id(&state.db, current.id)? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let outcomes = state.characters.outcomes_for_user(user.id).await?;

    Ok(Html(ProfileTemplate {
        logged_in: true,
        user,
        outcomes,
    })
    .into_response())
}
