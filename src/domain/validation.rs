use chrono::{DateTime, NaiveDate, Utc};

use super::{
    BookingDatesInput, BookingField, BookingValidationError, DateRange, END_DATE_NOT_AFTER_START,
    FieldErrors, START_DATE_IN_PAST,
};

/// 暦日として日付文字列を解釈する
///
/// `YYYY-MM-DD` と RFC 3339 タイムスタンプを受け付ける。
/// タイムスタンプはUTCの日付部分に切り詰める。
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn parse_field(
    raw: Option<&str>,
    field: BookingField,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let Some(raw) = raw else {
        errors.attach(field, format!("{} is required", field.as_str()));
        return None;
    };
    let parsed = parse_calendar_date(raw);
    if parsed.is_none() {
        errors.attach(field, format!("{} must be a valid date", field.as_str()));
    }
    parsed
}

/// 純粋関数：予約日付を検証し、正規化された日付範囲を返す
///
/// ルール（この順に適用）：
/// 1. 両フィールドが存在し、日付として解釈できること
/// 2. startDate が今日より前でないこと
/// 3. endDate が startDate より後であること
///
/// 2と3は両方評価してからエラーを返すため、1回のレスポンスで
/// 両フィールドのエラーを報告できる。
///
/// # 引数
/// * `input` - クライアントからの生入力
/// * `today` - 判定基準日（UTC、日付のみ）。テストで固定できるよう引数で受け取る
pub fn validate_booking_dates(
    input: &BookingDatesInput,
    today: NaiveDate,
) -> Result<DateRange, BookingValidationError> {
    let mut errors = FieldErrors::new();

    // 1. 存在と形式
    let start = parse_field(input.start_date.as_deref(), BookingField::StartDate, &mut errors);
    let end = parse_field(input.end_date.as_deref(), BookingField::EndDate, &mut errors);

    let (Some(start), Some(end)) = (start, end) else {
        return Err(BookingValidationError::MissingOrMalformedField(errors));
    };

    // 2. 過去日の禁止
    if start < today {
        errors.attach(BookingField::StartDate, START_DATE_IN_PAST);
    }

    // 3. 順序
    if end <= start {
        errors.attach(BookingField::EndDate, END_DATE_NOT_AFTER_START);
    }

    match DateRange::new(start, end) {
        Some(range) if errors.is_empty() => Ok(range),
        _ => Err(BookingValidationError::ValidationFailed(errors)),
    }
}
