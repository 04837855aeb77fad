use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::types::{PoolSchedule, VestingState};

/// Clock parameters shared by every pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub distribution_start: u64,
    pub epoch_duration: u64,
}

impl Timeline {
    pub fn new(distribution_start: u64, epoch_duration: u64) -> Result<Self, ContractError> {
        if epoch_duration == 0 {
            return Err(ContractError::InvalidEpochDuration {});
        }
        Ok(Timeline {
            distribution_start,
            epoch_duration,
        })
    }

    /// Moment from which installments of the pool are active.
    pub fn cliff_end(&self, schedule: &PoolSchedule) -> u64 {
        self.distribution_start.saturating_add(schedule.cliff)
    }

    /// Number of full epochs elapsed since the cliff, `None` before the cliff.
    pub fn elapsed_epochs(&self, schedule: &PoolSchedule, now: u64) -> Option<u64> {
        now.checked_sub(self.cliff_end(schedule))
            .map(|passed| passed / self.epoch_duration)
    }
}

/// Amount released by a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub value: Uint128,
    pub installments_ended: bool,
}

/// Computes the amount newly unlocked for a pool at `now` and records it in `state`.
///
/// The release is always the difference between the cumulative amount due at `now`
/// and what was already released, so a caller that skipped several epochs receives
/// all of them at once and the final call receives the exact remainder of the stake.
/// `state` is left untouched when an error is returned.
pub fn compute_newly_unlocked(
    schedule: &PoolSchedule,
    state: &mut VestingState,
    timeline: &Timeline,
    now: u64,
) -> Result<Release, ContractError> {
    let pool = schedule.pool.as_u8();
    if state.installments_ended {
        return Err(ContractError::PoolInactive { pool });
    }

    let elapsed_epochs = timeline
        .elapsed_epochs(schedule, now)
        .ok_or(ContractError::NotYetActive { pool })?;

    let target = schedule.unlocked_at(elapsed_epochs)?;
    let value = target.checked_sub(state.cumulative_released)?;

    // The first release after the cliff goes through even if nothing is due yet, which
    // only happens for pools without a cliff payment called exactly at the cliff.
    if value.is_zero() && state.first_installment_made {
        return Err(ContractError::NothingDue { pool });
    }

    state.cumulative_released = target;
    state.first_installment_made = true;
    state.installments_ended = state.cumulative_released == schedule.stake;

    Ok(Release {
        value,
        installments_ended: state.installments_ended,
    })
}

/// Releases the prepayment tranche of a pool. Only the very first release of a pool
/// can carry the prepayment; afterwards it is part of the cumulative target.
pub fn release_prepayment(
    schedule: &PoolSchedule,
    state: &mut VestingState,
) -> Result<Uint128, ContractError> {
    if state.first_installment_made || !state.cumulative_released.is_zero() {
        return Ok(Uint128::zero());
    }
    let value = schedule.prepayment_value();
    state.cumulative_released = value;
    state.installments_ended = value == schedule.stake;
    Ok(value)
}

/// Amount a call to make an installment would release at `now`, zero when the pool is
/// not active or nothing is due.
pub fn due_amount(
    schedule: &PoolSchedule,
    state: &VestingState,
    timeline: &Timeline,
    now: u64,
) -> Result<Uint128, ContractError> {
    let mut dry_run = state.clone();
    match compute_newly_unlocked(schedule, &mut dry_run, timeline, now) {
        Ok(release) => Ok(release.value),
        Err(ContractError::NotYetActive { .. })
        | Err(ContractError::PoolInactive { .. })
        | Err(ContractError::NothingDue { .. }) => Ok(Uint128::zero()),
        Err(err) => Err(err),
    }
}

/// Tokens of the pool not released yet.
pub fn tokens_left(
    schedule: &PoolSchedule,
    state: &VestingState,
) -> Result<Uint128, ContractError> {
    Ok(schedule.stake.checked_sub(state.cumulative_released)?)
}
