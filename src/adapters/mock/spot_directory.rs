use crate::domain::value_objects::{SpotId, UserId};
use crate::ports::spot_directory::{
    Result, SpotDirectory as SpotDirectoryTrait, SpotRef, SpotSummary,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// SpotDirectoryのモック実装
///
/// スポットを登録することで状態を持ったテストをサポート。
pub struct SpotDirectory {
    spots: Mutex<HashMap<SpotId, SpotSummary>>,
}

impl SpotDirectory {
    pub fn new() -> Self {
        Self {
            spots: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にスポットを登録
    pub fn add_spot(&self, summary: SpotSummary) {
        self.spots.lock().unwrap().insert(summary.id, summary);
    }

    /// テスト用に、オーナーだけを指定してスポットを登録
    pub fn add_spot_owned_by(&self, spot_id: SpotId, owner_id: UserId) {
        self.add_spot(SpotSummary {
            id: spot_id,
            owner_id,
            address: format!("{} Test Lane", spot_id),
            city: "Test Valley".to_string(),
            state: "CA".to_string(),
            country: "USA".to_string(),
            lat: 50.0,
            lng: 90.0,
            name: format!("Spot {}", spot_id),
            price: 299.0,
            preview_image: None,
        });
    }

    /// テスト用にスポットを削除
    pub fn remove_spot(&self, spot_id: SpotId) {
        self.spots.lock().unwrap().remove(&spot_id);
    }
}

impl Default for SpotDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotDirectoryTrait for SpotDirectory {
    async fn find_spot(&self, spot_id: SpotId) -> Result<Option<SpotRef>> {
        Ok(self.spots.lock().unwrap().get(&spot_id).map(|s| SpotRef {
            id: s.id,
            owner_id: s.owner_id,
        }))
    }

    async fn find_summaries(&self, spot_ids: &[SpotId]) -> Result<Vec<SpotSummary>> {
        let spots = self.spots.lock().unwrap();
        Ok(spot_ids
            .iter()
            .filter_map(|id| spots.get(id).cloned())
            .collect())
    }
}
