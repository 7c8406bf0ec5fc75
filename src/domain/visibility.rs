use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Booking, DateRange, SpotId, UserId};

/// 予約者のプロフィール（認証コンテキストから取得）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
}

/// スポット単位の予約一覧における1件の見え方
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingProjection {
    /// オーナー向け：予約者と監査情報を含む完全な予約
    ///
    /// 予約者は弱参照のため、プロフィールが見つからない場合は`None`
    Full {
        booking: Booking,
        booker: Option<UserProfile>,
    },
    /// オーナー以外向け：スポットと日付のみ。他の利用者の身元は隠す
    Public { spot_id: SpotId, dates: DateRange },
}

/// 純粋関数：オーナーかどうかで予約の見え方を選ぶ
pub fn project_booking(
    is_owner: bool,
    booking: Booking,
    booker: Option<UserProfile>,
) -> BookingProjection {
    if is_owner {
        BookingProjection::Full { booking, booker }
    } else {
        BookingProjection::Public {
            spot_id: booking.spot_id,
            dates: booking.dates,
        }
    }
}

/// 純粋関数：スポットの予約一覧を射影する
///
/// `bookers`はオーナーの場合にのみ参照される。
pub fn project_spot_bookings(
    is_owner: bool,
    bookings: Vec<Booking>,
    bookers: &HashMap<UserId, UserProfile>,
) -> Vec<BookingProjection> {
    bookings
        .into_iter()
        .map(|booking| {
            let booker = if is_owner {
                bookers.get(&booking.user_id).cloned()
            } else {
                None
            };
            project_booking(is_owner, booking, booker)
        })
        .collect()
}
