use crate::domain::{value_objects::UserId, visibility::UserProfile};
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// UserDirectoryのモック実装
///
/// プロフィールを登録することで状態を持ったテストをサポート。
pub struct UserDirectory {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にユーザーを登録
    pub fn add_user(&self, id: UserId, first_name: &str, last_name: &str) {
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn find_profiles(&self, user_ids: &[UserId]) -> Result<Vec<UserProfile>> {
        let users = self.users.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }
}
