use serde::Serialize;
use std::collections::BTreeMap;

pub const START_DATE_IN_PAST: &str = "startDate cannot be in the past";
pub const END_DATE_NOT_AFTER_START: &str = "endDate cannot be on or before startDate";
pub const START_DATE_CONFLICT: &str = "Start date conflicts with an existing booking";
pub const END_DATE_CONFLICT: &str = "End date conflicts with an existing booking";
pub const BOOKING_CONFLICT: &str = "Sorry, this spot is already booked for the specified dates";

/// エラーの帰属先となる入力フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    StartDate,
    EndDate,
}

impl BookingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::StartDate => "startDate",
            BookingField::EndDate => "endDate",
        }
    }
}

/// フィールド → メッセージのエラーマップ
///
/// 1フィールドにつきメッセージは1つ。最初に付与されたメッセージが残る。
/// JSONでは `{"startDate": "...", "endDate": "..."}` として直列化される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<BookingField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを付与する（既に同じフィールドにエラーがあれば何もしない）
    pub fn attach(&mut self, field: BookingField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: BookingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: BookingField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = BookingField> + '_ {
        self.0.keys().copied()
    }
}

/// 予約日付バリデーションのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// 必須フィールドの欠落、または日付として解釈できない
    MissingOrMalformedField(FieldErrors),
    /// 日付は読めたが時間的な整合性ルールに違反した
    ValidationFailed(FieldErrors),
}

impl BookingValidationError {
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            BookingValidationError::MissingOrMalformedField(errors)
            | BookingValidationError::ValidationFailed(errors) => errors,
        }
    }

    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            BookingValidationError::MissingOrMalformedField(errors)
            | BookingValidationError::ValidationFailed(errors) => errors,
        }
    }
}

/// 既存予約との衝突
///
/// 衝突したフィールドのマップを保持する。マップは必ず空でない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConflict {
    errors: FieldErrors,
}

impl BookingConflict {
    pub(crate) fn new(errors: FieldErrors) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn message(&self) -> &'static str {
        BOOKING_CONFLICT
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_field_errors(self) -> FieldErrors {
        self.errors
    }
}
