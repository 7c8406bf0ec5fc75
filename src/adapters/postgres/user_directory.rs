use crate::domain::{value_objects::UserId, visibility::UserProfile};
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// UserDirectoryのPostgreSQL実装
pub struct UserDirectory {
    pool: PgPool,
}

impl UserDirectory {
    /// PostgreSQLコネクションプールから新しいUserDirectoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn find_profiles(&self, user_ids: &[UserId]) -> Result<Vec<UserProfile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = user_ids.iter().map(UserId::value).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| UserProfile {
                id: UserId::from_i64(row.get("id")),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
            })
            .collect())
    }
}
