use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::types::{BeneficiaryKind, PoolId, PoolSchedule, ScheduleVariant};

pub const DAY: u64 = 24 * 60 * 60;
pub const WEEK: u64 = 7 * DAY;

/// Base units in one whole token (18 decimals).
const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Total supply distributed by either schedule variant, in whole tokens.
const SUPPLY: u128 = 8_537_500;

const GENESIS_POOLS: [PoolId; 5] = [
    PoolId::EcosystemFund,
    PoolId::PublicOffering,
    PoolId::PrivateOffering,
    PoolId::FoundationReward,
    PoolId::ExchangeRelatedActivities,
];

const EXTENDED_POOLS: [PoolId; 7] = [
    PoolId::RewardForStaking,
    PoolId::EcosystemFund,
    PoolId::PublicOffering,
    PoolId::PrivateOffering,
    PoolId::AdvisorsReward,
    PoolId::FoundationReward,
    PoolId::LiquidityFund,
];

fn tokens(whole: u128) -> Uint128 {
    Uint128::new(whole * TOKEN_UNIT)
}

fn immediate(pool: PoolId, stake: Uint128) -> PoolSchedule {
    PoolSchedule {
        pool,
        stake,
        cliff: 0,
        percent_at_cliff: 100,
        prepayment_percent: 0,
        number_of_installments: 0,
        beneficiary: BeneficiaryKind::Single,
    }
}

fn vested(
    pool: PoolId,
    stake: Uint128,
    cliff: u64,
    percent_at_cliff: u64,
    number_of_installments: u64,
) -> PoolSchedule {
    PoolSchedule {
        pool,
        stake,
        cliff,
        percent_at_cliff,
        prepayment_percent: 0,
        number_of_installments,
        beneficiary: BeneficiaryKind::Single,
    }
}

/// Total amount of tokens the distribution contract must hold before initialization.
pub fn total_supply(_variant: ScheduleVariant) -> Uint128 {
    tokens(SUPPLY)
}

/// Pools of a schedule variant, in release order.
pub fn pools(variant: ScheduleVariant) -> &'static [PoolId] {
    match variant {
        ScheduleVariant::Genesis => &GENESIS_POOLS,
        ScheduleVariant::Extended => &EXTENDED_POOLS,
    }
}

/// Looks up the schedule of a pool by its numeric id.
pub fn pool_schedule(variant: ScheduleVariant, pool: u8) -> Result<PoolSchedule, ContractError> {
    let pool = PoolId::try_from(pool)?;
    schedule_of(variant, pool).ok_or(ContractError::UnknownPool(pool.as_u8()))
}

/// Schedules of every pool of a variant.
pub fn pool_schedules(variant: ScheduleVariant) -> Vec<PoolSchedule> {
    pools(variant)
        .iter()
        .filter_map(|pool| schedule_of(variant, *pool))
        .collect()
}

fn schedule_of(variant: ScheduleVariant, pool: PoolId) -> Option<PoolSchedule> {
    let schedule = match (variant, pool) {
        (ScheduleVariant::Genesis, PoolId::EcosystemFund) => {
            vested(pool, tokens(4_000_000), 48 * WEEK, 10, 96)
        }
        (ScheduleVariant::Genesis, PoolId::PublicOffering) => immediate(pool, tokens(400_000)),
        (ScheduleVariant::Genesis, PoolId::PrivateOffering) => PoolSchedule {
            prepayment_percent: 25,
            beneficiary: BeneficiaryKind::Participants,
            ..vested(pool, tokens(2_438_451), 4 * WEEK, 10, 36)
        },
        (ScheduleVariant::Genesis, PoolId::FoundationReward) => {
            vested(pool, tokens(699_049), 12 * WEEK, 20, 48)
        }
        (ScheduleVariant::Genesis, PoolId::ExchangeRelatedActivities) => {
            immediate(pool, tokens(1_000_000))
        }
        (ScheduleVariant::Extended, PoolId::RewardForStaking) => PoolSchedule {
            beneficiary: BeneficiaryKind::Bridge,
            ..vested(pool, tokens(3_000_000), 12 * WEEK, 100, 0)
        },
        (ScheduleVariant::Extended, PoolId::EcosystemFund) => {
            vested(pool, tokens(1_000_000), 48 * WEEK, 10, 96)
        }
        (ScheduleVariant::Extended, PoolId::PublicOffering) => immediate(pool, tokens(1_000_000)),
        (ScheduleVariant::Extended, PoolId::PrivateOffering) => PoolSchedule {
            prepayment_percent: 25,
            beneficiary: BeneficiaryKind::Participants,
            ..vested(pool, tokens(1_500_000), 4 * WEEK, 10, 36)
        },
        (ScheduleVariant::Extended, PoolId::AdvisorsReward) => PoolSchedule {
            beneficiary: BeneficiaryKind::Participants,
            ..vested(pool, tokens(500_000), 12 * WEEK, 10, 48)
        },
        (ScheduleVariant::Extended, PoolId::FoundationReward) => {
            vested(pool, tokens(1_037_500), 12 * WEEK, 20, 48)
        }
        (ScheduleVariant::Extended, PoolId::LiquidityFund) => immediate(pool, tokens(500_000)),
        _ => return None,
    };
    Some(schedule)
}

/// Checks a single schedule: pools without installments release everything at the
/// cliff, every other pool keeps part of its stake for the installments.
pub fn validate_schedule(schedule: &PoolSchedule) -> Result<(), ContractError> {
    let upfront = schedule.percent_at_cliff + schedule.prepayment_percent;
    let valid = if schedule.number_of_installments == 0 {
        upfront == 100
    } else {
        upfront < 100
    };
    if !valid || schedule.stake.is_zero() {
        return Err(ContractError::InvalidSchedule(schedule.pool.as_u8()));
    }
    Ok(())
}

/// Checks every schedule of a variant and that their stakes add up to the supply.
pub fn validate_variant(variant: ScheduleVariant) -> Result<(), ContractError> {
    let mut sum = Uint128::zero();
    for schedule in pool_schedules(variant) {
        validate_schedule(&schedule)?;
        sum = sum.checked_add(schedule.stake)?;
    }
    if sum != total_supply(variant) {
        return Err(ContractError::WrongBalance {
            expected: total_supply(variant),
            actual: sum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_consistent() {
        validate_variant(ScheduleVariant::Genesis).unwrap();
        validate_variant(ScheduleVariant::Extended).unwrap();
        assert_eq!(pool_schedules(ScheduleVariant::Genesis).len(), 5);
        assert_eq!(pool_schedules(ScheduleVariant::Extended).len(), 7);
    }

    #[test]
    fn unknown_pools() {
        assert_eq!(
            pool_schedule(ScheduleVariant::Genesis, 0).unwrap_err(),
            ContractError::UnknownPool(0)
        );
        assert_eq!(
            pool_schedule(ScheduleVariant::Genesis, 9).unwrap_err(),
            ContractError::UnknownPool(9)
        );
        // advisors reward only exists in the extended generation
        assert_eq!(
            pool_schedule(ScheduleVariant::Genesis, 7).unwrap_err(),
            ContractError::UnknownPool(7)
        );
        assert_eq!(
            pool_schedule(ScheduleVariant::Extended, 5).unwrap_err(),
            ContractError::UnknownPool(5)
        );

        let advisors = pool_schedule(ScheduleVariant::Extended, 7).unwrap();
        assert_eq!(advisors.pool, PoolId::AdvisorsReward);
        assert_eq!(advisors.beneficiary, BeneficiaryKind::Participants);
    }

    #[test]
    fn invalid_schedules() {
        let mut schedule = pool_schedule(ScheduleVariant::Genesis, 3).unwrap();
        schedule.percent_at_cliff = 75;
        assert_eq!(
            validate_schedule(&schedule).unwrap_err(),
            ContractError::InvalidSchedule(3)
        );

        let mut schedule = pool_schedule(ScheduleVariant::Genesis, 2).unwrap();
        schedule.percent_at_cliff = 90;
        assert_eq!(
            validate_schedule(&schedule).unwrap_err(),
            ContractError::InvalidSchedule(2)
        );
    }
}
