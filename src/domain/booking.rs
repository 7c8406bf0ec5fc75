use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, DateRange, SpotId, UserId};

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// 提案中の予約
///
/// ビジネスルール：
/// - まだ永続化されておらず、どのクエリからも見えない
/// - 衝突判定にも数えられない
/// - `admit`でのみ`Booking`に遷移する（逆方向の遷移はない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedBooking {
    pub spot_id: SpotId,
    pub user_id: UserId,
    pub dates: DateRange,
}

/// 受付済みの予約
///
/// ビジネスルール：
/// - 作成後は不変（updated_atを除く）
/// - 同じスポットの受付済み予約同士は重ならない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub id: BookingId,

    // 他の集約への参照（IDのみ）
    pub spot_id: SpotId,
    pub user_id: UserId,

    pub dates: DateRange,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn start_date(&self) -> NaiveDate {
        self.dates.start()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.dates.end()
    }
}

/// 純粋関数：予約を提案する
pub fn propose_booking(spot_id: SpotId, user_id: UserId, dates: DateRange) -> ProposedBooking {
    ProposedBooking {
        spot_id,
        user_id,
        dates,
    }
}

impl ProposedBooking {
    /// 提案を受付済みにする
    ///
    /// ストアの排他区間内で衝突がないことを確認した後にのみ呼ばれる。
    /// IDの採番とタイムスタンプはストアが決める。
    pub fn admit(self, id: BookingId, admitted_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            spot_id: self.spot_id,
            user_id: self.user_id,
            dates: self.dates,
            created_at: admitted_at,
            updated_at: admitted_at,
        }
    }
}

/// 予約の並び順（開始日の昇順、同日ならID順）
pub fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by_key(|b| (b.dates.start(), b.id));
}
