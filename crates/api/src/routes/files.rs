use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use diskview_services::{DiskError, TypeFilter, listing::validate_public_key};
use serde::Deserialize;

use crate::{error::ApiError, extractors::session::Session, state::AppState, views};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub public_key: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub public_key: String,
    pub file_type: Option<String>,
}

/// GET /
pub async fn index(session: Session) -> Html<String> {
    Html(views::index_page(None, "", session.auth_state()))
}

/// GET /files/?public_key=..&file_type=..
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let Some(public_key) = query.public_key.filter(|k| !k.trim().is_empty()) else {
        return Ok(Redirect::to("/").into_response());
    };
    let public_key = validate_public_key(&public_key)?;
    let filter = TypeFilter::from_param(query.file_type.as_deref());

    render_listing(&state, &session, &public_key, &filter).await
}

/// POST /files/
///
/// An invalid link re-renders the form with the message inline instead of
/// an error page.
pub async fn list_submitted(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
    Form(form): Form<LinkForm>,
) -> Result<Response, ApiError> {
    let public_key = match validate_public_key(&form.public_key) {
        Ok(key) => key,
        Err(DiskError::InvalidLink(msg)) => {
            let page = views::index_page(Some(&msg), &form.public_key, session.auth_state());
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let file_type = form.file_type.or(query.file_type);
    let filter = TypeFilter::from_param(file_type.as_deref());

    render_listing(&state, &session, &public_key, &filter).await
}

async fn render_listing(
    state: &AppState,
    session: &Session,
    public_key: &str,
    filter: &TypeFilter,
) -> Result<Response, ApiError> {
    let entries = state
        .listing
        .list(public_key, filter, session.token())
        .await?;

    Ok(Html(views::file_list_page(public_key, filter, &entries)).into_response())
}
