use axum::{
    body::Body,
    extract::{Query, RawForm, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use diskview_services::archive::ARCHIVE_FILE_NAME;
use serde::Deserialize;
use tracing::debug;

use crate::{error::ApiError, extractors::session::Session, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub public_key: String,
    pub path: String,
}

/// `attachment` disposition with an ASCII fallback name plus the exact
/// UTF-8 name in `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        format!("attachment; filename=\"{}\"", file_name)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(file_name)
        )
    }
}

/// GET /download/?public_key=..&path=..
pub async fn download_file(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let file = state
        .downloads
        .download_one(&query.public_key, &query.path, session.token())
        .await?;

    let mut builder = Response::builder()
        .header(
            header::CONTENT_TYPE,
            file.content_type
                .as_deref()
                .unwrap_or("application/octet-stream"),
        )
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&file.file_name),
        );
    if let Some(length) = file.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(file.stream))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// POST /download_multiple/ with `public_key` and repeated `selected_files`.
pub async fn download_multiple(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    RawForm(body): RawForm,
) -> Result<Response, ApiError> {
    let mut public_key = None;
    let mut selected = Vec::new();
    for (key, value) in url::form_urlencoded::parse(&body) {
        match key.as_ref() {
            "public_key" if public_key.is_none() => public_key = Some(value.into_owned()),
            "selected_files" => selected.push(value.into_owned()),
            _ => {}
        }
    }

    if selected.is_empty() {
        let back = headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("/");
        debug!("No files selected, redirecting back");
        return Ok(Redirect::to(back).into_response());
    }

    let public_key = public_key.unwrap_or_default();
    let archive = state
        .downloads
        .download_many(&public_key, &selected, session.token())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(ARCHIVE_FILE_NAME),
            ),
        ],
        archive,
    )
        .into_response())
}
