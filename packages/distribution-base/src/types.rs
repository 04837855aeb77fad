use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Uint128};

use crate::error::ContractError;

/// Identifier of a distribution pool.
///
/// On the wire pools are addressed by their numeric id; `0` is reserved and never
/// maps to a pool.
#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord)]
pub enum PoolId {
    EcosystemFund = 1,
    PublicOffering = 2,
    PrivateOffering = 3,
    FoundationReward = 4,
    ExchangeRelatedActivities = 5,
    RewardForStaking = 6,
    AdvisorsReward = 7,
    LiquidityFund = 8,
}

impl PoolId {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoolId::EcosystemFund => "ecosystem_fund",
            PoolId::PublicOffering => "public_offering",
            PoolId::PrivateOffering => "private_offering",
            PoolId::FoundationReward => "foundation_reward",
            PoolId::ExchangeRelatedActivities => "exchange_related_activities",
            PoolId::RewardForStaking => "reward_for_staking",
            PoolId::AdvisorsReward => "advisors_reward",
            PoolId::LiquidityFund => "liquidity_fund",
        }
    }
}

impl TryFrom<u8> for PoolId {
    type Error = ContractError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PoolId::EcosystemFund),
            2 => Ok(PoolId::PublicOffering),
            3 => Ok(PoolId::PrivateOffering),
            4 => Ok(PoolId::FoundationReward),
            5 => Ok(PoolId::ExchangeRelatedActivities),
            6 => Ok(PoolId::RewardForStaking),
            7 => Ok(PoolId::AdvisorsReward),
            8 => Ok(PoolId::LiquidityFund),
            _ => Err(ContractError::UnknownPool(value)),
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment generation of the pool table.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ScheduleVariant {
    /// Five pools: ecosystem fund, public and private offering, foundation reward and
    /// exchange related activities.
    Genesis,
    /// Seven pools: adds reward for staking, advisors reward and liquidity fund, drops
    /// exchange related activities.
    Extended,
}

/// Who receives the tokens released for a pool.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum BeneficiaryKind {
    /// A single address configured per pool.
    Single,
    /// A multiple-distribution contract that apportions releases among participants.
    Participants,
    /// The bridge address configured by the owner.
    Bridge,
}

/// Immutable vesting parameters of a pool.
#[cw_serde]
pub struct PoolSchedule {
    pub pool: PoolId,
    /// Total amount of tokens allocated to the pool
    pub stake: Uint128,
    /// Seconds from the distribution start until the cliff
    pub cliff: u64,
    /// Percent of the stake released at the cliff
    pub percent_at_cliff: u64,
    /// Percent of the stake released at initialization, before the cliff
    pub prepayment_percent: u64,
    /// Number of equal epoch installments after the cliff
    pub number_of_installments: u64,
    pub beneficiary: BeneficiaryKind,
}

impl PoolSchedule {
    pub fn cliff_value(&self) -> Uint128 {
        self.stake.multiply_ratio(self.percent_at_cliff, 100u128)
    }

    pub fn prepayment_value(&self) -> Uint128 {
        self.stake.multiply_ratio(self.prepayment_percent, 100u128)
    }

    /// Value of a single installment. The integer division remainder is paid with the
    /// last installment.
    pub fn installment_value(&self) -> StdResult<Uint128> {
        if self.number_of_installments == 0 {
            return Ok(Uint128::zero());
        }
        let rest = self
            .stake
            .checked_sub(self.cliff_value())?
            .checked_sub(self.prepayment_value())?;
        Ok(rest.checked_div(Uint128::from(self.number_of_installments))?)
    }

    /// Cumulative amount unlocked once `elapsed_epochs` full epochs have passed since
    /// the cliff.
    pub fn unlocked_at(&self, elapsed_epochs: u64) -> StdResult<Uint128> {
        if elapsed_epochs >= self.number_of_installments {
            return Ok(self.stake);
        }
        let installments = self
            .installment_value()?
            .checked_mul(Uint128::from(elapsed_epochs))?;
        Ok(self
            .prepayment_value()
            .checked_add(self.cliff_value())?
            .checked_add(installments)?)
    }
}

/// Mutable release state of a pool.
#[cw_serde]
#[derive(Default)]
pub struct VestingState {
    /// Amount released so far, never decreasing and never above the pool stake
    pub cumulative_released: Uint128,
    /// Set once the whole stake is released
    pub installments_ended: bool,
    /// Set by the first release at or after the cliff
    pub first_installment_made: bool,
}

/// Main parameters of the distribution contract.
#[cw_serde]
pub struct Config {
    /// Token being distributed, known after initialization
    pub token: Option<Addr>,
    /// Length of one installment period in seconds
    pub staking_epoch_duration: u64,
    pub variant: ScheduleVariant,
    /// Set once at initialization from the block time
    pub distribution_start_timestamp: Option<u64>,
    /// Receiver of the reward for staking pool
    pub bridge_address: Option<Addr>,
}

/// Parameters of a multiple-distribution contract.
#[cw_serde]
pub struct LedgerConfig {
    pub pool: PoolId,
    pub variant: ScheduleVariant,
    /// Distribution contract allowed to initialize the ledger and release tokens into it
    pub distribution: Option<Addr>,
    /// Token being distributed, known after initialization
    pub token: Option<Addr>,
}

/// Aggregate state of a participant ledger.
#[cw_serde]
pub struct LedgerState {
    /// Stake of the whole pool
    pub pool_stake: Uint128,
    /// Sum of the registered participants' stakes
    pub total_shares: Uint128,
    /// Cumulative amount released into the ledger (the watermark)
    pub total_released: Uint128,
    /// Number of registered participants, the burn remainder excluded
    pub participant_count: u32,
    pub finalized: bool,
    /// Unallocated remainder, set at finalization
    pub burn: ShareAccount,
}

/// Stake and withdrawn amount of a ledger account.
#[cw_serde]
#[derive(Default)]
pub struct ShareAccount {
    pub stake: Uint128,
    pub paid: Uint128,
}

/// A registered participant of a multi-beneficiary pool.
#[cw_serde]
pub struct Participant {
    pub stake: Uint128,
    pub paid: Uint128,
    /// Position in the dense participant index
    pub slot: u32,
}
