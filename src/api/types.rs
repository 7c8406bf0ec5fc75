use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::booking::UserBooking;
use crate::domain::{Booking, BookingDatesInput, BookingProjection, FieldErrors, UserProfile};
use crate::ports::SpotSummary;

/// 予約作成リクエスト（POST /spots/:spot_id/bookings）
///
/// 日付の解釈はドメインのバリデーションに任せるため、値は型を縛らずに受け取る。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
}

fn raw_date(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        // 数値などは文字列化し、形式エラーとして報告させる
        other => Some(other.to_string()),
    }
}

impl CreateBookingRequest {
    pub fn into_input(self) -> BookingDatesInput {
        BookingDatesInput {
            start_date: raw_date(self.start_date),
            end_date: raw_date(self.end_date),
        }
    }
}

// 暦日を UTC 0時のタイムスタンプとして出力する
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 完全な予約レコード
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub spot_id: i64,
    pub user_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.value(),
            spot_id: booking.spot_id.value(),
            user_id: booking.user_id.value(),
            start_date: midnight_utc(booking.start_date()),
            end_date: midnight_utc(booking.end_date()),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// 予約に添えるスポットの要約
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummaryResponse {
    pub id: i64,
    pub owner_id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub price: f64,
    pub preview_image: Option<String>,
}

impl From<SpotSummary> for SpotSummaryResponse {
    fn from(spot: SpotSummary) -> Self {
        Self {
            id: spot.id.value(),
            owner_id: spot.owner_id.value(),
            address: spot.address,
            city: spot.city,
            state: spot.state,
            country: spot.country,
            lat: spot.lat,
            lng: spot.lng,
            name: spot.name,
            price: spot.price,
            preview_image: spot.preview_image,
        }
    }
}

/// GET /bookings/current の1件
#[derive(Debug, Serialize)]
pub struct CurrentUserBookingResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    #[serde(rename = "Spot")]
    pub spot: Option<SpotSummaryResponse>,
}

impl From<UserBooking> for CurrentUserBookingResponse {
    fn from(item: UserBooking) -> Self {
        Self {
            booking: BookingResponse::from(item.booking),
            spot: item.spot.map(SpotSummaryResponse::from),
        }
    }
}

/// 予約者
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserProfile> for BookerResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.value(),
            first_name: profile.first_name,
            last_name: profile.last_name,
        }
    }
}

/// オーナー向けの予約（予約者を含む）
#[derive(Debug, Serialize)]
pub struct OwnerSpotBookingResponse {
    #[serde(rename = "User")]
    pub user: Option<BookerResponse>,
    #[serde(flatten)]
    pub booking: BookingResponse,
}

/// オーナー以外向けの予約（スポットと日付のみ）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSpotBookingResponse {
    pub spot_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// GET /spots/:spot_id/bookings の1件
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SpotBookingResponse {
    Owner(OwnerSpotBookingResponse),
    Public(PublicSpotBookingResponse),
}

impl From<BookingProjection> for SpotBookingResponse {
    fn from(projection: BookingProjection) -> Self {
        match projection {
            BookingProjection::Full { booking, booker } => {
                SpotBookingResponse::Owner(OwnerSpotBookingResponse {
                    user: booker.map(BookerResponse::from),
                    booking: BookingResponse::from(booking),
                })
            }
            BookingProjection::Public { spot_id, dates } => {
                SpotBookingResponse::Public(PublicSpotBookingResponse {
                    spot_id: spot_id.value(),
                    start_date: dates.start(),
                    end_date: dates.end(),
                })
            }
        }
    }
}

/// 予約一覧のエンベロープ `{"Bookings": [...]}`
#[derive(Debug, Serialize)]
pub struct BookingsResponse<T> {
    #[serde(rename = "Bookings")]
    pub bookings: Vec<T>,
}

impl<T> BookingsResponse<T> {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<T>,
    {
        Self {
            bookings: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            message: message.into(),
            errors: Some(errors),
        }
    }
}
