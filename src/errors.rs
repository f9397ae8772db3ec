use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{PartialSchema, ToSchema};

use crate::store::StoreError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);

        (code, body).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("entity not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("authentication required")]
    Unauthenticated,
    #[error("wrong nick or password")]
    InvalidCredentials,
    #[error("nick '{0}' is already taken")]
    DuplicateNick(String),
    #[error("start date is after end date")]
    InvalidRange,
    #[error("start date is in the past")]
    InvalidStartDate,
    #[error("bid must exceed the current price of {current}")]
    PriceTooLow { current: u64 },
    #[error("listing is outside its bidding window")]
    ListingNotActive,
    #[error("{0}")]
    Validation(String),
    #[error("listing changed concurrently, retry the bid")]
    Conflict,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("JWT operation failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("password hash error: {0}")]
    PasswordHash(#[from] scrypt::password_hash::Error),
}

impl ApiError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::DuplicateNick(_) | ApiError::ListingNotActive | ApiError::Conflict => {
                StatusCode::CONFLICT
            }
            ApiError::InvalidRange
            | ApiError::InvalidStartDate
            | ApiError::PriceTooLow { .. }
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Jwt(_) | ApiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(value: ApiError) -> Self {
        Self {
            status: value.status().as_u16(),
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

impl PartialSchema for ApiError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl ToSchema for ApiError {
    fn schemas(
        schemas: &mut Vec<(
            String,
            utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
        )>,
    ) {
        <ErrorResponse as ToSchema>::schemas(schemas);
    }
}
