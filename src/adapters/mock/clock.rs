use crate::ports::clock::Clock;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Mutex;

/// 固定時刻を返すClockのモック実装
///
/// テストから日単位で時刻を進められる。
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 指定日のUTC正午に固定
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12))
    }

    pub fn advance_days(&self, days: i64) {
        *self.now.lock().unwrap() += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
