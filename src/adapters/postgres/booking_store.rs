use crate::domain::{
    Booking, BoundaryPolicy, DateRange, ProposedBooking, detect_conflicts,
    value_objects::{BookingId, SpotId, UserId},
};
use crate::ports::booking_store::{AdmitOutcome, BookingStore as BookingStoreTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをBookingに変換する
///
/// DB側のCHECK制約で start_date < end_date は保証されているが、
/// 違反した行はpanicせずエラーとして返す。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let start_date: NaiveDate = row.get("start_date");
    let end_date: NaiveDate = row.get("end_date");
    let dates = DateRange::new(start_date, end_date).ok_or_else(|| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("booking has empty date range: {} .. {}", start_date, end_date),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        id: BookingId::from_i64(row.get("id")),
        spot_id: SpotId::from_i64(row.get("spot_id")),
        user_id: UserId::from_i64(row.get("user_id")),
        dates,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// BookingStoreのPostgreSQL実装
///
/// 受付は1トランザクションで行う。スポット行の`SELECT ... FOR UPDATE`が
/// 存在確認とスポット単位のロックを兼ねる。
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// PostgreSQLコネクションプールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    /// スポットの予約を開始日順に取得
    async fn find_by_spot(&self, spot_id: SpotId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT id, spot_id, user_id, start_date, end_date, created_at, updated_at
            FROM bookings
            WHERE spot_id = $1
            ORDER BY start_date ASC, id ASC
            "#,
        )
        .bind(spot_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    /// 予約者の予約を開始日順に取得
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        sqlx::query(
            r#"
            SELECT id, spot_id, user_id, start_date, end_date, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY start_date ASC, id ASC
            "#,
        )
        .bind(user_id.value())
        .fetch(&self.pool)
        .map(|row_result| {
            let row = row_result?;
            map_row_to_booking(&row)
        })
        .try_collect()
        .await
    }

    /// 予約を原子的に受け付ける
    ///
    /// 1. スポット行をロック（存在しなければSpotNotFound）
    /// 2. ロック下で、提案と接しうる既存予約を読み直す
    /// 3. ドメインの衝突判定
    /// 4. 挿入してコミット
    ///
    /// 途中で戻った場合、トランザクションはドロップ時にロールバックされる。
    async fn admit(
        &self,
        proposal: ProposedBooking,
        boundary: BoundaryPolicy,
        admitted_at: DateTime<Utc>,
    ) -> Result<AdmitOutcome> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM spots
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(proposal.spot_id.value())
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(AdmitOutcome::SpotNotFound);
        }

        // 境界で接する予約も含めて取得する（Inclusiveポリシー用）
        let rows = sqlx::query(
            r#"
            SELECT id, spot_id, user_id, start_date, end_date, created_at, updated_at
            FROM bookings
            WHERE spot_id = $1
              AND start_date <= $3
              AND end_date >= $2
            ORDER BY start_date ASC, id ASC
            "#,
        )
        .bind(proposal.spot_id.value())
        .bind(proposal.dates.start())
        .bind(proposal.dates.end())
        .fetch_all(&mut *tx)
        .await?;

        let existing = rows
            .iter()
            .map(map_row_to_booking)
            .collect::<Result<Vec<_>>>()?;

        if let Err(conflict) =
            detect_conflicts(&proposal.dates, existing.iter().map(|b| &b.dates), boundary)
        {
            return Ok(AdmitOutcome::Conflict(conflict));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO bookings (spot_id, user_id, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(proposal.spot_id.value())
        .bind(proposal.user_id.value())
        .bind(proposal.dates.start())
        .bind(proposal.dates.end())
        .bind(admitted_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        // TIMESTAMPTZはマイクロ秒精度なので、DBに保存された値を使う
        let id = BookingId::from_i64(row.get("id"));
        let created_at: DateTime<Utc> = row.get("created_at");
        Ok(AdmitOutcome::Admitted(proposal.admit(id, created_at)))
    }
}
