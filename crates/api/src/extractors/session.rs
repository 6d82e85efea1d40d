use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    session::{AuthState, SessionData, session_id_from_headers},
    state::AppState,
};

/// The caller's session, resolved from the session cookie.
///
/// `id` is only set when the cookie names a session the store knows about;
/// a request without one gets empty data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: Option<String>,
    pub data: SessionData,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.data.disk_token.as_deref()
    }

    pub fn auth_state(&self) -> AuthState {
        self.data.auth_state()
    }
}

impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let Some((id, data)) = session_id_from_headers(&parts.headers)
            .and_then(|id| app_state.sessions.get(&id).map(|data| (id, data)))
        else {
            return Ok(Session::default());
        };

        Ok(Session { id: Some(id), data })
    }
}
