use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use diskview_services::{DiskError, OAuthError};
use tracing::warn;

use crate::views;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Non-2xx answer from the provider; the status is passed through.
    Upstream { status: StatusCode, message: String },
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => *status,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Upstream { message: msg, .. }
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            warn!(status = status.as_u16(), %message, "Request failed");
        }

        (status, Html(views::error_page(status, &message))).into_response()
    }
}

impl From<DiskError> for ApiError {
    fn from(err: DiskError) -> Self {
        match err {
            DiskError::InvalidLink(msg) => ApiError::BadRequest(msg),
            DiskError::UpstreamRejected { status, message } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            DiskError::UpstreamUnavailable(msg) => ApiError::BadGateway(msg),
            DiskError::DownloadUnavailable(path) => {
                ApiError::BadGateway(format!("Could not get a download link for {}", path))
            }
            DiskError::Archive(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::Upstream(e) => e.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
