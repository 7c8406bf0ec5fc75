use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 日付範囲 `[start, end)`
///
/// 開始日を含み、終了日を含まない半開区間。日単位で時刻は持たない。
///
/// 不変条件：`start < end`
/// コンストラクタでこの制約を強制し、空や逆転した範囲を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

// 逆直列化もコンストラクタを通す
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
            .ok_or_else(|| format!("empty date range: {} .. {}", raw.start, raw.end))
    }
}

impl DateRange {
    /// 新規作成
    ///
    /// `start >= end` の場合は`None`を返す
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 2つの範囲が少なくとも1日を共有するか
    ///
    /// 境界で接するだけ（一方の終了日 = 他方の開始日）の場合は重ならない。
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `start <= day < end` のとき真
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }
}
