use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ApiError;

pub mod auth;
pub mod listing;
pub mod user;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlainSuccessResponse {
    pub status: u16,
    pub message: String,
}

impl PlainSuccessResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for PlainSuccessResponse {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let body = Json(self);

        (code, body).into_response()
    }
}
