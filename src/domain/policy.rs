use std::str::FromStr;

/// 境界で接する予約をどう扱うか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// 半開区間。接するだけの予約は衝突しない
    #[default]
    HalfOpen,
    /// 接する境界も衝突として報告する（旧来の挙動）
    Inclusive,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::HalfOpen => "half-open",
            BoundaryPolicy::Inclusive => "inclusive",
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half-open" => Ok(BoundaryPolicy::HalfOpen),
            "inclusive" => Ok(BoundaryPolicy::Inclusive),
            _ => Err(format!("Invalid boundary policy: {}", s)),
        }
    }
}

/// 予約受付ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    pub boundary: BoundaryPolicy,
    /// スポットのオーナーが自分のスポットを予約できるか
    pub allow_owner_self_booking: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::HalfOpen,
            allow_owner_self_booking: true,
        }
    }
}
