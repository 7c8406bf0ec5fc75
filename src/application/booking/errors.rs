use crate::domain::{BookingConflict, BookingValidationError};
use thiserror::Error;

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// スポットが存在しない
    #[error("Spot couldn't be found")]
    SpotNotFound,

    /// オーナーによる自分のスポットの予約（ポリシーで禁止されている場合）
    #[error("Owner cannot book their own spot")]
    OwnerCannotBookOwnSpot,

    /// 日付のバリデーションエラー（衝突判定の前）
    #[error("Invalid booking dates")]
    InvalidDates(BookingValidationError),

    /// 既存予約との衝突（バリデーションの後）
    #[error("{}", .0.message())]
    Conflict(BookingConflict),

    /// BookingStoreのエラー
    #[error("Booking store error")]
    BookingStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// SpotDirectoryのエラー
    #[error("Spot directory error")]
    SpotDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
