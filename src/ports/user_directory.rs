use crate::domain::{value_objects::UserId, visibility::UserProfile};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーディレクトリポート
///
/// 予約コンテキストは`UserId`のみを保持する。
/// 氏名はオーナーが予約一覧を見るときにここから取得する。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 複数ユーザーのプロフィールをまとめて取得する
    ///
    /// 見つからないIDは結果に含まれない。
    async fn find_profiles(&self, user_ids: &[UserId]) -> Result<Vec<UserProfile>>;
}
