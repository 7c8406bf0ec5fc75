use super::{
    BookingConflict, BookingField, BoundaryPolicy, DateRange, END_DATE_CONFLICT, FieldErrors,
    START_DATE_CONFLICT,
};

fn start_conflicts(existing: &DateRange, proposed: &DateRange, policy: BoundaryPolicy) -> bool {
    let start = proposed.start();
    match policy {
        BoundaryPolicy::HalfOpen => existing.start() <= start && start < existing.end(),
        BoundaryPolicy::Inclusive => existing.start() <= start && start <= existing.end(),
    }
}

fn end_conflicts(existing: &DateRange, proposed: &DateRange, policy: BoundaryPolicy) -> bool {
    let end = proposed.end();
    match policy {
        BoundaryPolicy::HalfOpen => existing.start() < end && end <= existing.end(),
        BoundaryPolicy::Inclusive => existing.start() <= end && end <= existing.end(),
    }
}

fn surrounds(existing: &DateRange, proposed: &DateRange) -> bool {
    proposed.start() <= existing.start() && proposed.end() >= existing.end()
}

/// 純粋関数：提案された日付範囲と既存予約の衝突を検出する
///
/// 既存予約 E と提案 P について：
/// - P の開始日が E の中にある → startDate
/// - P の終了日が E の中にある → endDate
/// - P が E を包含する → 両方
///
/// 境界の扱いは`policy`で決まる。`HalfOpen`では接するだけの予約は衝突しない。
/// 各フィールドのメッセージは高々1つ。両フィールドが揃った時点で走査を打ち切る。
///
/// # 戻り値
/// 衝突がなければ`Ok(())`、あれば衝突フィールドを持つ`BookingConflict`
pub fn detect_conflicts<'a, I>(
    proposed: &DateRange,
    existing: I,
    policy: BoundaryPolicy,
) -> Result<(), BookingConflict>
where
    I: IntoIterator<Item = &'a DateRange>,
{
    let mut errors = FieldErrors::new();

    for booked in existing {
        let surrounded = surrounds(booked, proposed);

        if surrounded || start_conflicts(booked, proposed, policy) {
            errors.attach(BookingField::StartDate, START_DATE_CONFLICT);
        }
        if surrounded || end_conflicts(booked, proposed, policy) {
            errors.attach(BookingField::EndDate, END_DATE_CONFLICT);
        }

        if errors.len() == 2 {
            break;
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BookingConflict::new(errors))
    }
}
