use chrono::{DateTime, NaiveDate, Utc};

/// 時計ポート
///
/// 「現在」と「今日」の取得はすべてここを通す。テストでは固定した時計を注入する。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// UTCでの今日の日付
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
