use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Ошибки доменных сервисов. Хендлеры транслируют их в HTTP статусы
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Некорректные данные запроса (400)
    #[error("{0}")]
    Validation(String),

    /// Конфликт с существующими данными, например дубль SKU (400)
    #[error("{0}")]
    Conflict(String),

    /// Запись не найдена (404)
    #[error("{0}")]
    NotFound(String),

    /// Внутренняя ошибка, обычно хранилище (500)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Ошибка HTTP-слоя: статус плюс тело `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(detail) | ServiceError::Conflict(detail) => Self {
                status: StatusCode::BAD_REQUEST,
                detail,
            },
            ServiceError::NotFound(detail) => Self {
                status: StatusCode::NOT_FOUND,
                detail,
            },
            ServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: "Internal server error".to_string(),
                }
            }
        }
    }
}
