use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("data service error: {0}")]
    Store(String),

    #[error("AI provider error: {0}")]
    Ai(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("payment processing failed")]
    PaymentDeclined,

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn store(err: anyhow::Error) -> Self {
        AppError::Store(format!("{err:#}"))
    }

    pub fn ai(err: anyhow::Error) -> Self {
        AppError::Ai(format!("{err:#}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Ai(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::CONFLICT,
            AppError::PaymentDeclined => StatusCode::PAYMENT_REQUIRED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
