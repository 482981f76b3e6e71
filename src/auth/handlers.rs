use askama::Template;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::users::{self, LoginRequest, SignupRequest};
use crate::auth::session;
use crate::config::AuthConfig;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::extractors::{cookie_value, RequestContext, ValidatedJson};
use crate::routes::home::Html;
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "pages/signup.html")]
pub struct SignupTemplate {
    pub logged_in: bool,
}

// -- Cookie helpers --

fn session_cookie(auth: &AuthConfig, token: &str) -> String {
    let max_age_secs = auth.session_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        auth.cookie_name, token, max_age_secs
    )
}

fn clear_session_cookie(auth: &AuthConfig) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        auth.cookie_name
    )
}

/// Open a session for `user` and answer with the user plus the cookie.
fn signed_in(state: &AppState, user: User) -> AppResult<Response> {
    let token = session::create_session(&state.db, user.id, state.config.auth.session_hours)?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&state.config.auth, &token))],
        Json(user),
    )
        .into_response())
}

// -- Pages --

/// GET /login — already signed-in users go straight to their profile
pub async fn login_page(ctx: RequestContext) -> Response {
    if ctx.logged_in() {
        return Redirect::to("/profile").into_response();
    }
    Html(LoginTemplate { logged_in: false }).into_response()
}

/// GET /signup
pub async fn signup_page(ctx: RequestContext) -> Response {
    if ctx.logged_in() {
        return Redirect::to("/profile").into_response();
    }
    Html(SignupTemplate { logged_in: false }).into_response()
}

// -- API handlers --

/// POST /api/users — create an account and sign in
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> AppResult<Response> {
    let hash = hash_password_blocking(req.password, state.config.auth.password_cost).await?;
    let user = users::create_user(&state.db, &req.username, &req.email, &hash)?;
    tracing::info!(user_id = user.id, "User signed up");
    signed_in(&state, user)
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    let user = match users::find_by_email(&state.db, &req.email)? {
        Some(user) => user,
        None => {
            tracing::warn!("Failed login attempt");
            return Err(AppError::Unauthorized);
        }
    };
    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }
    tracing::info!(user_id = user.id, "User logged in");
    signed_in(&state, user)
}

/// POST /api/users/logout — delete session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Response> {
    let (parts, _body) = request.into_parts();

    if let Some(token) = cookie_value(&parts, &state.config.auth.cookie_name) {
        if let Err(e) = session::delete_session(&state.db, token) {
            tracing::warn!("Failed to delete session on logout: {}", e);
        }
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(&state.config.auth))],
    )
        .into_response())
}
