use crate::domain::value_objects::{SpotId, UserId};
use crate::ports::spot_directory::{
    Result, SpotDirectory as SpotDirectoryTrait, SpotRef, SpotSummary,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_summary(row: &PgRow) -> SpotSummary {
    SpotSummary {
        id: SpotId::from_i64(row.get("id")),
        owner_id: UserId::from_i64(row.get("owner_id")),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        country: row.get("country"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        name: row.get("name"),
        price: row.get("price"),
        preview_image: row.get("preview_image"),
    }
}

/// SpotDirectoryのPostgreSQL実装
///
/// スポット管理コンテキストが所有するスポットを読み取り専用で参照する。
pub struct SpotDirectory {
    pool: PgPool,
}

impl SpotDirectory {
    /// PostgreSQLコネクションプールから新しいSpotDirectoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpotDirectoryTrait for SpotDirectory {
    async fn find_spot(&self, spot_id: SpotId) -> Result<Option<SpotRef>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id
            FROM spots
            WHERE id = $1
            "#,
        )
        .bind(spot_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SpotRef {
            id: SpotId::from_i64(row.get("id")),
            owner_id: UserId::from_i64(row.get("owner_id")),
        }))
    }

    /// 要約を1回の問い合わせでまとめて取得
    ///
    /// previewImageはプレビュー指定された最も古い画像。なければNULL。
    async fn find_summaries(&self, spot_ids: &[SpotId]) -> Result<Vec<SpotSummary>> {
        if spot_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = spot_ids.iter().map(SpotId::value).collect();
        let rows = sqlx::query(
            r#"
            SELECT
                s.id,
                s.owner_id,
                s.address,
                s.city,
                s.state,
                s.country,
                s.lat,
                s.lng,
                s.name,
                s.price,
                (
                    SELECT si.url
                    FROM spot_images si
                    WHERE si.spot_id = s.id AND si.preview
                    ORDER BY si.id ASC
                    LIMIT 1
                ) AS preview_image
            FROM spots s
            WHERE s.id = ANY($1)
            ORDER BY s.id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_summary).collect())
    }
}
