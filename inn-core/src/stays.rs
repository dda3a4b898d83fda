use inn_shared::StayStatus;

use crate::{CoreError, CoreResult};

/// What the store should do for a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Apply `from → to` as a conditional update.
    Apply { from: StayStatus, to: StayStatus },
    /// Already in the requested state; nothing to write.
    Noop,
}

/// Transition rules for a stay:
///
/// - `CheckedIn → CheckedOut` (check-out)
/// - `CheckedIn → Cancelled`
/// - `CheckedOut → CheckedOut` is accepted as a no-op
///
/// Nothing leaves `CheckedOut` or `Cancelled`.
pub fn plan_transition(current: StayStatus, target: StayStatus) -> CoreResult<TransitionPlan> {
    match (current, target) {
        (StayStatus::CheckedIn, StayStatus::CheckedOut | StayStatus::Cancelled) => {
            Ok(TransitionPlan::Apply { from: current, to: target })
        }
        (StayStatus::CheckedOut, StayStatus::CheckedOut) => Ok(TransitionPlan::Noop),
        (from, to) => Err(CoreError::InvalidTransition { from, to }),
    }
}
