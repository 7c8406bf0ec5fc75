use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::value_objects::UserId;

use super::error::ApiError;

/// 認証済みリクエスト者のIDを運ぶヘッダー
///
/// セッション管理は前段のコンテキストが行い、ここではIDのみを受け取る。
pub const USER_ID_HEADER: &str = "x-user-id";

/// 認証済みのリクエスト者
///
/// ヘッダーが無いか整数として読めない場合は401で拒否する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|id| AuthenticatedUser(UserId::from_i64(id)))
            .ok_or(ApiError::Unauthenticated)
    }
}
