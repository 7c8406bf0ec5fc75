use serde::{Deserialize, Serialize};

use super::{SpotId, UserId};

/// 予約日付の生入力
///
/// クライアントから受け取ったままの文字列。解釈とバリデーションは
/// `validation::validate_booking_dates` が行う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDatesInput {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BookingDatesInput {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

/// コマンド：スポットを予約する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub spot_id: SpotId,
    pub user_id: UserId,
    pub dates: BookingDatesInput,
}
