use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use diskview_services::OAuthError;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::ApiError, extractors::session::Session, session::session_cookie, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /oauth/start/
pub async fn start(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ApiError> {
    let oauth = state.oauth.as_ref().ok_or(OAuthError::NotConfigured)?;

    let session_id = state.sessions.begin_authorization(session.id.as_deref());

    Ok((
        [(header::SET_COOKIE, session_cookie(&session_id))],
        Redirect::to(&oauth.authorize_url()),
    )
        .into_response())
}

/// GET /oauth/callback/?code=.. or ?error=..&error_description=..
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let result = exchange(&state, query).await;

    let token = match result {
        Ok(token) => token,
        Err(e) => {
            if let Some(id) = session.id.as_deref() {
                state.sessions.abort_authorization(id);
            }
            warn!(error = %e, "OAuth callback failed");
            return Err(e.into());
        }
    };

    let session_id = state.sessions.store_token(session.id.as_deref(), token);
    info!("Session authorized");

    Ok((
        [(header::SET_COOKIE, session_cookie(&session_id))],
        Redirect::to("/"),
    )
        .into_response())
}

async fn exchange(state: &AppState, query: CallbackQuery) -> Result<String, OAuthError> {
    if let Some(error) = query.error {
        return Err(OAuthError::Provider {
            error,
            description: query.error_description.unwrap_or_default(),
        });
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Err(OAuthError::Provider {
            error: "missing_code".to_string(),
            description: "The callback carried no authorization code".to_string(),
        });
    };

    let oauth = state.oauth.as_ref().ok_or(OAuthError::NotConfigured)?;
    oauth.exchange_code(&code).await
}
