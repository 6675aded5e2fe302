//! Cookie-backed server-side sessions.
//!
//! A session maps an opaque random token to the [`Actor`] who logged in.
//! The token travels in an `HttpOnly` cookie; the actor never leaves the
//! server.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use domain::Actor;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "bakery_session";

/// In-process session table.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Actor>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `actor` and returns its token.
    pub async fn create(&self, actor: Actor) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.write().await.insert(token, actor);
        token
    }

    /// Looks up the actor behind a token.
    pub async fn get(&self, token: Uuid) -> Option<Actor> {
        self.sessions.read().await.get(&token).cloned()
    }

    /// Closes a session. Unknown tokens are ignored.
    pub async fn remove(&self, token: Uuid) -> Option<Actor> {
        self.sessions.write().await.remove(&token)
    }

    /// Resolves the actor from a request's cookies.
    pub async fn actor_from_headers(&self, headers: &HeaderMap) -> Option<Actor> {
        let token = token_from_headers(headers)?;
        self.get(token).await
    }
}

/// Reads the session token out of the `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value that installs a session token.
pub fn session_cookie(token: Uuid) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// The logged-in employee, extracted from the session cookie.
///
/// Handlers that take this extractor answer 401 when there is no valid
/// session.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionStore::from_ref(state);
        sessions
            .actor_from_headers(&parts.headers)
            .await
            .map(CurrentActor)
            .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))
    }
}
