use crate::application::booking::{
    BookingApplicationError, ServiceDependencies, create_booking as execute_create_booking,
    list_current_user_bookings as execute_list_current_user_bookings,
    list_spot_bookings as execute_list_spot_bookings,
};
use crate::domain::{CreateBooking, value_objects::SpotId};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    auth::AuthenticatedUser,
    error::ApiError,
    types::{
        BookingResponse, BookingsResponse, CreateBookingRequest, CurrentUserBookingResponse,
        SpotBookingResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// 整数として読めないスポットIDは存在しないスポットとして扱う
fn parse_spot_id(raw: &str) -> Result<SpotId, ApiError> {
    raw.parse::<i64>()
        .map(SpotId::from_i64)
        .map_err(|_| ApiError::from(BookingApplicationError::SpotNotFound))
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /spots/:spot_id/bookings - スポットを予約
///
/// 強制されるビジネスルール:
/// - スポットが存在すること（本文が不正でも404が優先）
/// - 開始日が過去でなく、終了日が開始日より後であること
/// - 同じスポットの既存予約と重ならないこと
///
/// JSONとして読めない本文は、両フィールドの欠落として扱う。
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(spot_id): Path<String>,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let spot_id = parse_spot_id(&spot_id)?;

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!("Unreadable booking body: {}", rejection);
            CreateBookingRequest::default()
        }
    };

    let cmd = CreateBooking {
        spot_id,
        user_id,
        dates: req.into_input(),
    };

    let booking = execute_create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/current - 自分の予約一覧
///
/// 各予約にスポットの要約（`Spot`）を添えて返す。
pub async fn list_current_user_bookings(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<BookingsResponse<CurrentUserBookingResponse>>, ApiError> {
    let bookings = execute_list_current_user_bookings(&state.service_deps, user_id).await?;
    Ok(Json(BookingsResponse::new(bookings)))
}

/// GET /spots/:spot_id/bookings - スポットの予約一覧
///
/// オーナーには予約者（`User`）を含む完全な形、
/// それ以外にはスポットIDと日付のみを返す。
pub async fn list_spot_bookings(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(spot_id): Path<String>,
) -> Result<Json<BookingsResponse<SpotBookingResponse>>, ApiError> {
    let spot_id = parse_spot_id(&spot_id)?;
    let projections = execute_list_spot_bookings(&state.service_deps, spot_id, user_id).await?;
    Ok(Json(BookingsResponse::new(projections)))
}
