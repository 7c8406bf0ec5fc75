use crate::domain::{
    Booking, BoundaryPolicy, ProposedBooking, detect_conflicts, sort_bookings,
    value_objects::{BookingId, SpotId, UserId},
};
use crate::ports::booking_store::{AdmitOutcome, BookingStore as BookingStoreTrait, Result};
use crate::ports::spot_directory::SpotDirectory;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// スポット1件分の受付済み予約（開始日順）
type SpotLedger = Arc<RwLock<Vec<Booking>>>;

/// BookingStoreのインメモリ実装
///
/// スポットIDをキーにしたロック表を持つ。受付はそのスポットの書き込みロックの中で
/// 存在確認・衝突判定・挿入を行うため、別スポットの受付同士は並行に進む。
/// 一覧取得は読み込みロックのみを取る。
pub struct BookingStore {
    ledgers: DashMap<SpotId, SpotLedger>,
    spot_directory: Arc<dyn SpotDirectory>,
    next_id: AtomicI64,
}

impl BookingStore {
    /// スポットの存在確認に使うディレクトリを渡して作成
    pub fn new(spot_directory: Arc<dyn SpotDirectory>) -> Self {
        Self {
            ledgers: DashMap::new(),
            spot_directory,
            next_id: AtomicI64::new(1),
        }
    }

    // DashMapのシャードロックはawaitをまたいで保持しない
    fn ledger(&self, spot_id: SpotId) -> SpotLedger {
        self.ledgers.entry(spot_id).or_default().value().clone()
    }

    fn existing_ledger(&self, spot_id: SpotId) -> Option<SpotLedger> {
        self.ledgers.get(&spot_id).map(|e| e.value().clone())
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn find_by_spot(&self, spot_id: SpotId) -> Result<Vec<Booking>> {
        let Some(ledger) = self.existing_ledger(spot_id) else {
            return Ok(Vec::new());
        };
        let bookings = ledger.read().await.clone();
        Ok(bookings)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let ledgers: Vec<SpotLedger> = self.ledgers.iter().map(|e| e.value().clone()).collect();

        let mut found = Vec::new();
        for ledger in ledgers {
            let bookings = ledger.read().await;
            found.extend(bookings.iter().filter(|b| b.user_id == user_id).cloned());
        }

        sort_bookings(&mut found);
        Ok(found)
    }

    async fn admit(
        &self,
        proposal: ProposedBooking,
        boundary: BoundaryPolicy,
        admitted_at: DateTime<Utc>,
    ) -> Result<AdmitOutcome> {
        let ledger = self.ledger(proposal.spot_id);
        let mut bookings = ledger.write().await;

        // 1. ロック内でスポットの存在を再確認
        if self.spot_directory.find_spot(proposal.spot_id).await?.is_none() {
            // 空のままのエントリは残さない
            if bookings.is_empty() {
                self.ledgers
                    .remove_if(&proposal.spot_id, |_, entry| Arc::ptr_eq(entry, &ledger));
            }
            return Ok(AdmitOutcome::SpotNotFound);
        }

        // 2. 確定済みの予約に対して衝突判定
        if let Err(conflict) =
            detect_conflicts(&proposal.dates, bookings.iter().map(|b| &b.dates), boundary)
        {
            return Ok(AdmitOutcome::Conflict(conflict));
        }

        // 3. 採番して挿入（開始日順を維持）
        let id = BookingId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst));
        let booking = proposal.admit(id, admitted_at);
        let key = (booking.start_date(), booking.id);
        let position = bookings.partition_point(|b| (b.start_date(), b.id) < key);
        bookings.insert(position, booking.clone());

        Ok(AdmitOutcome::Admitted(booking))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::SpotDirectory as MockSpotDirectory;
    use crate::domain::{BookingField, DateRange, propose_booking};
    use chrono::NaiveDate;

    fn dates(start: u32, end: u32) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2032, 5, start).unwrap(),
            NaiveDate::from_ymd_opt(2032, 5, end).unwrap(),
        )
        .unwrap()
    }

    fn setup() -> (Arc<BookingStore>, SpotId, SpotId) {
        let spots = Arc::new(MockSpotDirectory::new());
        let spot_a = SpotId::from_i64(1);
        let spot_b = SpotId::from_i64(2);
        spots.add_spot_owned_by(spot_a, UserId::from_i64(100));
        spots.add_spot_owned_by(spot_b, UserId::from_i64(100));
        (Arc::new(BookingStore::new(spots)), spot_a, spot_b)
    }

    async fn admit(store: &BookingStore, spot_id: SpotId, user: i64, range: DateRange) -> AdmitOutcome {
        store
            .admit(
                propose_booking(spot_id, UserId::from_i64(user), range),
                BoundaryPolicy::HalfOpen,
                Utc::now(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_admit_and_find_by_spot() {
        let (store, spot_a, _) = setup();

        let outcome = admit(&store, spot_a, 7, dates(1, 3)).await;
        let AdmitOutcome::Admitted(booking) = outcome else {
            panic!("expected Admitted");
        };

        let found = store.find_by_spot(spot_a).await.unwrap();
        assert_eq!(found, vec![booking]);
    }

    #[tokio::test]
    async fn test_admit_unknown_spot() {
        let (store, _, _) = setup();
        let outcome = admit(&store, SpotId::from_i64(999), 7, dates(1, 3)).await;
        assert_eq!(outcome, AdmitOutcome::SpotNotFound);
        assert!(store.find_by_spot(SpotId::from_i64(999)).await.unwrap().is_empty());
        assert!(!store.ledgers.contains_key(&SpotId::from_i64(999)));
    }

    // 削除されたスポットへの受付はロック表にエントリを残さない
    #[tokio::test]
    async fn test_admit_to_removed_spot_leaves_no_ledger() {
        let spots = Arc::new(MockSpotDirectory::new());
        let spot_id = SpotId::from_i64(5);
        spots.add_spot_owned_by(spot_id, UserId::from_i64(100));
        let store = BookingStore::new(spots.clone());

        spots.remove_spot(spot_id);
        for _ in 0..3 {
            assert_eq!(admit(&store, spot_id, 7, dates(1, 3)).await, AdmitOutcome::SpotNotFound);
        }

        assert!(store.ledgers.is_empty());
    }

    // 受付済みの予約があるスポットは、削除後もエントリを保持する
    #[tokio::test]
    async fn test_removed_spot_keeps_admitted_bookings() {
        let spots = Arc::new(MockSpotDirectory::new());
        let spot_id = SpotId::from_i64(5);
        spots.add_spot_owned_by(spot_id, UserId::from_i64(100));
        let store = BookingStore::new(spots.clone());
        admit(&store, spot_id, 7, dates(1, 3)).await;

        spots.remove_spot(spot_id);
        assert_eq!(admit(&store, spot_id, 7, dates(5, 6)).await, AdmitOutcome::SpotNotFound);

        assert_eq!(store.find_by_spot(spot_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admit_conflict_is_not_inserted() {
        let (store, spot_a, _) = setup();
        admit(&store, spot_a, 7, dates(5, 9)).await;

        let outcome = admit(&store, spot_a, 8, dates(6, 10)).await;
        let AdmitOutcome::Conflict(conflict) = outcome else {
            panic!("expected Conflict");
        };
        assert!(conflict.field_errors().contains(BookingField::StartDate));
        assert_eq!(store.find_by_spot(spot_a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_dates_on_different_spots_do_not_conflict() {
        let (store, spot_a, spot_b) = setup();
        assert!(matches!(admit(&store, spot_a, 7, dates(5, 9)).await, AdmitOutcome::Admitted(_)));
        assert!(matches!(admit(&store, spot_b, 7, dates(5, 9)).await, AdmitOutcome::Admitted(_)));
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let (store, spot_a, spot_b) = setup();
        let AdmitOutcome::Admitted(first) = admit(&store, spot_a, 7, dates(1, 2)).await else {
            panic!("expected Admitted");
        };
        let AdmitOutcome::Admitted(second) = admit(&store, spot_b, 7, dates(1, 2)).await else {
            panic!("expected Admitted");
        };
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_by_user_orders_by_start_date_across_spots() {
        let (store, spot_a, spot_b) = setup();
        admit(&store, spot_a, 7, dates(20, 22)).await;
        admit(&store, spot_b, 7, dates(3, 4)).await;
        admit(&store, spot_a, 8, dates(10, 12)).await;
        admit(&store, spot_a, 7, dates(1, 2)).await;

        let found = store.find_by_user(UserId::from_i64(7)).await.unwrap();
        let starts: Vec<u32> = found
            .iter()
            .map(|b| chrono::Datelike::day(&b.start_date()))
            .collect();
        assert_eq!(starts, vec![1, 3, 20]);
    }

    // 同じ範囲への同時受付は1件だけ成功する
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admission_admits_exactly_one() {
        let (store, spot_a, _) = setup();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { admit(&store, spot_a, 1000 + i, dates(10, 14)).await })
            })
            .collect();

        let mut admitted = 0;
        let mut conflicted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                AdmitOutcome::Admitted(_) => admitted += 1,
                AdmitOutcome::Conflict(_) => conflicted += 1,
                AdmitOutcome::SpotNotFound => panic!("spot should exist"),
            }
        }

        assert_eq!(admitted, 1);
        assert_eq!(conflicted, 15);
        assert_eq!(store.find_by_spot(spot_a).await.unwrap().len(), 1);
    }

    // 受付済みの予約同士は重ならない
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mixed_ranges_never_overlap() {
        let (store, spot_a, _) = setup();

        let handles: Vec<_> = (1..=20u32)
            .flat_map(|start| (1..=4u32).map(move |len| (start, start + len)))
            .map(|(start, end)| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { admit(&store, spot_a, 1, dates(start, end)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let admitted = store.find_by_spot(spot_a).await.unwrap();
        assert!(!admitted.is_empty());
        for (i, a) in admitted.iter().enumerate() {
            for b in &admitted[i + 1..] {
                assert!(!a.dates.overlaps(&b.dates), "{:?} overlaps {:?}", a.dates, b.dates);
            }
        }
    }
}
