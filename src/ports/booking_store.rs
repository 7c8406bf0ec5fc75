use crate::domain::{
    Booking, BookingConflict, BoundaryPolicy, ProposedBooking,
    value_objects::{SpotId, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 受付処理の結果
///
/// ビジネス上の結果はエラーではなくタグ付きの値として返す。
/// ポートの`Err`はI/Oやロック取得の失敗のみを表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// 受付済み。ストアが採番したIDとタイムスタンプを持つ
    Admitted(Booking),
    /// スポットが存在しない
    SpotNotFound,
    /// 排他区間内の最新状態に対して衝突した
    Conflict(BookingConflict),
}

/// 予約ストアポート
///
/// スポットごとの受付済み予約の唯一の正本。原子性の境界を提供する。
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// スポットの受付済み予約を開始日順に取得する
    ///
    /// 排他ロックは取らない。多少古い結果でもよい。
    async fn find_by_spot(&self, spot_id: SpotId) -> Result<Vec<Booking>>;

    /// 予約者の受付済み予約を開始日順に取得する
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>>;

    /// 提案された予約を原子的に受け付ける
    ///
    /// スポット単位の排他区間（ロックまたはトランザクション）の中で：
    /// 1. スポットの存在を再確認する
    /// 2. その時点で確定している予約に対して衝突判定を再実行する
    /// 3. 衝突がなければ挿入する
    ///
    /// 呼び出し側が事前に行った判定は参考でしかない。正式な判定はここで行う。
    /// 別のスポットへの受付同士は競合しない。
    async fn admit(
        &self,
        proposal: ProposedBooking,
        boundary: BoundaryPolicy,
        admitted_at: DateTime<Utc>,
    ) -> Result<AdmitOutcome>;
}
