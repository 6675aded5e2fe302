//! Login, logout and the landing pages.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect};
use domain::Actor;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::session::{CurrentActor, expired_session_cookie, session_cookie, token_from_headers};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub employee: Actor,
}

#[derive(Serialize)]
pub struct LoginFormResponse {
    pub bakery_name: String,
    pub fields: [&'static str; 2],
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub bakery_name: String,
    pub employee: Actor,
}

/// GET / — send the visitor to the dashboard or to the login form.
pub async fn index<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Redirect {
    match state.sessions.actor_from_headers(&headers).await {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

/// GET /login — describes the login form.
pub async fn login_form<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<LoginFormResponse> {
    Json(LoginFormResponse {
        bakery_name: state.bakery_name.clone(),
        fields: ["username", "password"],
    })
}

/// POST /login — check credentials and open a session.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn login<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = state
        .employees
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.sessions.create(actor.clone()).await;

    let body = LoginResponse {
        message: format!("Welcome, {}!", actor.display_name),
        employee: actor,
    };
    Ok(([(SET_COOKIE, session_cookie(token))], Json(body)))
}

/// POST /logout — close the session, if any.
pub async fn logout<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = token_from_headers(&headers) {
        if let Some(actor) = state.sessions.remove(token).await {
            tracing::info!(username = %actor.username, "logged out");
        }
    }

    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}

/// GET /dashboard — bakery name and the logged-in employee.
pub async fn dashboard<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentActor(actor): CurrentActor,
) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        bakery_name: state.bakery_name.clone(),
        employee: actor,
    })
}
