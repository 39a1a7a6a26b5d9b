use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::aliases::DieselError;

/// Envelope every JSON endpoint responds with.
#[derive(Serialize, ToSchema, Debug)]
pub struct StdResponse<T, M> {
    pub data: Option<T>,
    pub message: Option<M>,
}

impl<T, M> IntoResponse for StdResponse<T, M>
where
    T: Serialize,
    M: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    ForbiddenResource(String),

    #[error("{0}")]
    Conflict(String),

    /// The payment provider refused or could not confirm a payment.
    #[error("Payment verification failed")]
    PaymentFailed(String),

    #[error("{0} is unreachable")]
    ServiceUnreachable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenResource(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::ServiceUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound,
            other => AppError::Other(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs
        let message = match &self {
            AppError::Other(err) => {
                tracing::error!(error = ?err, "Request failed");
                "Internal server error".to_string()
            }
            AppError::PaymentFailed(reason) => {
                tracing::warn!(reason = %reason, "Payment verification failed");
                self.to_string()
            }
            AppError::ServiceUnreachable(service) => {
                tracing::error!(service = %service, "Upstream service unreachable");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            StdResponse::<(), String> {
                data: None,
                message: Some(message),
            },
        )
            .into_response()
    }
}
