use crate::domain::value_objects::{SpotId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約判定に必要なスポット情報（IDとオーナーのみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotRef {
    pub id: SpotId,
    pub owner_id: UserId,
}

/// 予約一覧に添えるスポットの要約
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSummary {
    pub id: SpotId,
    pub owner_id: UserId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub price: f64,
    /// プレビュー画像のURL。なければ`None`
    pub preview_image: Option<String>,
}

/// スポットディレクトリポート
///
/// 予約コンテキストとスポット管理コンテキストの境界を維持する。
/// 予約コンテキストはスポットのCRUDを行わない。
#[async_trait]
pub trait SpotDirectory: Send + Sync {
    /// スポットを取得する
    ///
    /// 存在確認とオーナー判定に使用される。
    async fn find_spot(&self, spot_id: SpotId) -> Result<Option<SpotRef>>;

    /// 複数スポットの要約をまとめて取得する
    ///
    /// 見つからないIDは結果に含まれない。
    async fn find_summaries(&self, spot_ids: &[SpotId]) -> Result<Vec<SpotSummary>>;
}
