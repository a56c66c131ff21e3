use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 预测流水线错误
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("No snapshots provided")]
    EmptyInput,

    #[error("{table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("{table}: invalid number '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("{table}: negative quantity {value} for '{item}' at row {row}")]
    NegativeQuantity {
        table: String,
        item: String,
        row: usize,
        value: f64,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// 是否为调用方输入问题（映射为 400）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyInput
                | ForecastError::MissingColumn { .. }
                | ForecastError::InvalidNumber { .. }
                | ForecastError::NegativeQuantity { .. }
                | ForecastError::Csv(_)
        )
    }
}

/// 周期记录存储错误
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// HTTP 边界错误
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed upload: {}", e.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forecast(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            AppError::Forecast(_) | AppError::Repository(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_message_names_table_and_column() {
        let err = ForecastError::MissingColumn {
            table: "sales plan".to_string(),
            column: "Qty".to_string(),
        };
        assert_eq!(err.to_string(), "sales plan is missing required column 'Qty'");
    }

    #[test]
    fn input_errors_map_to_bad_request() {
        let response = AppError::from(ForecastError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let response = AppError::from(ForecastError::from(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
