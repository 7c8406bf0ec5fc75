use crate::application::booking::BookingApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// 認証失敗と、アプリケーション層のエラーをHTTPレスポンスにマッピングする。
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    Application(BookingApplicationError),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

fn internal_error() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new("Internal Server Error"),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            // 401 Unauthorized
            ApiError::Unauthenticated => {
                let body = Json(ErrorResponse::new("Authentication required"));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            ApiError::Application(err) => err,
        };

        let (status, body) = match err {
            // 404 Not Found - 日付の妥当性より優先される
            BookingApplicationError::SpotNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Spot couldn't be found"),
            ),

            // 403 Forbidden
            BookingApplicationError::OwnerCannotBookOwnSpot => {
                (StatusCode::FORBIDDEN, ErrorResponse::new("Forbidden"))
            }
            BookingApplicationError::Conflict(conflict) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::with_errors(conflict.message(), conflict.into_field_errors()),
            ),

            // 400 Bad Request - フィールド単位のエラーをそのまま返す
            BookingApplicationError::InvalidDates(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_errors("Bad Request", e.into_field_errors()),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            BookingApplicationError::BookingStoreError(e) => {
                tracing::error!("Booking store error: {}", e);
                internal_error()
            }
            BookingApplicationError::SpotDirectoryError(e) => {
                tracing::error!("Spot directory error: {}", e);
                internal_error()
            }
            BookingApplicationError::UserDirectoryError(e) => {
                tracing::error!("User directory error: {}", e);
                internal_error()
            }
        };

        (status, Json(body)).into_response()
    }
}
