use crate::domain::{
    self, Booking, BookingPolicy, BookingProjection, CreateBooking,
    value_objects::{SpotId, UserId},
};
use crate::ports::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各ユースケース関数に明示的に渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_store: Arc<dyn BookingStore>,
    pub spot_directory: Arc<dyn SpotDirectory>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub clock: Arc<dyn Clock>,
    pub policy: BookingPolicy,
}

/// 予約者本人向けの予約一覧の1件
///
/// スポットは弱参照のため、要約が見つからない場合は`None`
#[derive(Debug, Clone, PartialEq)]
pub struct UserBooking {
    pub booking: Booking,
    pub spot: Option<SpotSummary>,
}

/// スポットの存在を確認するヘルパー関数
///
/// create_booking と list_spot_bookings で共通利用される。
///
/// # エラー
/// - SpotDirectoryError: 取得失敗
/// - SpotNotFound: スポットが存在しない
async fn load_spot(spot_directory: &Arc<dyn SpotDirectory>, spot_id: SpotId) -> Result<SpotRef> {
    spot_directory
        .find_spot(spot_id)
        .await
        .map_err(BookingApplicationError::SpotDirectoryError)?
        .ok_or(BookingApplicationError::SpotNotFound)
}

fn distinct<T: Ord + Copy>(ids: impl Iterator<Item = T>) -> Vec<T> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

/// スポットを予約する
///
/// ビジネスルール（この順に判定）：
/// 1. スポットが存在すること（日付が不正でも404を優先する）
/// 2. ポリシーで禁止されていれば、オーナーは自分のスポットを予約できない
/// 3. 日付が妥当であること（過去日不可、終了日は開始日より後）
/// 4. 既存予約と衝突しないこと（ストアの排他区間内で判定）
///
/// # 一貫性保証
///
/// 4の判定と挿入は`BookingStore::admit`の中で原子的に行われる。
/// 同じスポットに重なる予約が同時に来ても、受け付けられるのは1件だけ。
/// 受付前にリクエストが中断された場合、予約は作成されない。
///
/// # 冪等性
///
/// 衝突するリクエストを何度送っても同じエラーが返り、二重に受け付けられることはない。
///
/// # 戻り値
/// 受付済みの予約
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. スポットの存在確認
    let spot = load_spot(&deps.spot_directory, cmd.spot_id).await?;

    // 2. オーナーによる自己予約の確認
    if !deps.policy.allow_owner_self_booking && spot.owner_id == cmd.user_id {
        return Err(BookingApplicationError::OwnerCannotBookOwnSpot);
    }

    // 3. 日付のバリデーション
    let dates = domain::validate_booking_dates(&cmd.dates, deps.clock.today()).map_err(|e| {
        tracing::debug!(spot_id = %cmd.spot_id, errors = ?e.field_errors(), "booking rejected by validation");
        BookingApplicationError::InvalidDates(e)
    })?;

    // 4. ストアの排他区間内で衝突判定と挿入
    let proposal = domain::propose_booking(spot.id, cmd.user_id, dates);
    let outcome = deps
        .booking_store
        .admit(proposal, deps.policy.boundary, deps.clock.now())
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    match outcome {
        AdmitOutcome::Admitted(booking) => {
            tracing::info!(
                booking_id = booking.id.value(),
                spot_id = %booking.spot_id,
                user_id = %booking.user_id,
                start_date = %booking.start_date(),
                end_date = %booking.end_date(),
                "booking admitted"
            );
            Ok(booking)
        }
        // 確認後にスポットが削除された
        AdmitOutcome::SpotNotFound => Err(BookingApplicationError::SpotNotFound),
        AdmitOutcome::Conflict(conflict) => {
            tracing::debug!(
                spot_id = %cmd.spot_id,
                errors = ?conflict.field_errors(),
                "booking rejected by conflict"
            );
            Err(BookingApplicationError::Conflict(conflict))
        }
    }
}

/// 現在のユーザーの予約一覧を取得する
///
/// 各予約にスポットの要約を添える。本人の予約なので常に完全な形で返す。
pub async fn list_current_user_bookings(
    deps: &ServiceDependencies,
    user_id: UserId,
) -> Result<Vec<UserBooking>> {
    let bookings = deps
        .booking_store
        .find_by_user(user_id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    if bookings.is_empty() {
        return Ok(Vec::new());
    }

    let spot_ids = distinct(bookings.iter().map(|b| b.spot_id));
    let summaries: HashMap<SpotId, SpotSummary> = deps
        .spot_directory
        .find_summaries(&spot_ids)
        .await
        .map_err(BookingApplicationError::SpotDirectoryError)?
        .into_iter()
        .map(|summary| (summary.id, summary))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let spot = summaries.get(&booking.spot_id).cloned();
            UserBooking { booking, spot }
        })
        .collect())
}

/// スポットの予約一覧を取得する
///
/// リクエスト者がオーナーなら予約者を含む完全な形、
/// そうでなければスポットIDと日付のみを返す。
///
/// # エラー
/// - SpotNotFound: スポットが存在しない
pub async fn list_spot_bookings(
    deps: &ServiceDependencies,
    spot_id: SpotId,
    requester: UserId,
) -> Result<Vec<BookingProjection>> {
    let spot = load_spot(&deps.spot_directory, spot_id).await?;
    let is_owner = spot.owner_id == requester;

    let bookings = deps
        .booking_store
        .find_by_spot(spot.id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    // オーナー以外には予約者を見せないので、プロフィールも取得しない
    let bookers = if is_owner && !bookings.is_empty() {
        let user_ids = distinct(bookings.iter().map(|b| b.user_id));
        deps.user_directory
            .find_profiles(&user_ids)
            .await
            .map_err(BookingApplicationError::UserDirectoryError)?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect()
    } else {
        HashMap::new()
    };

    Ok(domain::project_spot_bookings(is_owner, bookings, &bookers))
}
