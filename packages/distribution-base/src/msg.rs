use crate::types::{Config, PoolSchedule, ScheduleVariant, VestingState};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use cw_controllers::AdminResponse;

/// This structure describes the parameters used for creating the distribution contract.
#[cw_serde]
pub struct InstantiateMsg {
    /// Address allowed to initialize the distribution and change its parameters
    pub owner: String,
    /// Length of one installment period in seconds
    pub staking_epoch_duration: u64,
    /// Pool table to distribute with
    pub variant: ScheduleVariant,
    /// Receiver of every pool except the bridge-released one
    pub pool_addresses: Vec<PoolAddress>,
}

/// Address of a pool beneficiary. Multi-beneficiary pools point to their
/// multiple-distribution contract.
#[cw_serde]
pub struct PoolAddress {
    pub pool: u8,
    pub address: String,
}

/// This structure describes the execute messages available in the distribution contract.
#[cw_serde]
pub enum ExecuteMsg {
    /// Fixes the distribution start and performs the releases due at the start
    /// ## Executor
    /// Only the owner can execute this, once, with the whole supply on the contract balance
    Initialize { token: String },
    /// Releases everything due for a pool at the current block time
    /// ## Executor
    /// Anyone can execute this
    MakeInstallment { pool: u8 },
    /// Changes the beneficiary address of a pool
    /// ## Executor
    /// Only the current pool address or the owner can execute this
    ChangePoolAddress { pool: u8, address: String },
    /// Sets the receiver of the reward for staking pool
    /// ## Executor
    /// Only the owner can execute this
    SetBridgeAddress { address: String },
    /// Transfers contract ownership
    /// ## Executor
    /// Only the owner can execute this
    UpdateOwner { owner: String },
}

/// This structure describes the query messages available in the distribution contract.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns the configuration for the contract using a [`Config`] object.
    #[returns(Config)]
    Config {},
    /// Returns the contract owner.
    #[returns(AdminResponse)]
    Owner {},
    /// Returns the distribution start, `None` before initialization.
    #[returns(Option<u64>)]
    DistributionStartTimestamp {},
    /// Returns the schedule, address and release state of a pool.
    #[returns(PoolInfoResponse)]
    PoolInfo { pool: u8 },
    /// Returns the amount of tokens of a pool not released yet.
    #[returns(Uint128)]
    TokensLeft { pool: u8 },
    /// Returns the amount of tokens of a pool released so far.
    #[returns(Uint128)]
    CumulativeReleased { pool: u8 },
    /// Returns the amount an installment made now would release.
    #[returns(Uint128)]
    DueAmount { pool: u8 },
}

/// This structure describes a migration message.
/// We currently take no arguments for migrations.
#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct PoolInfoResponse {
    pub schedule: PoolSchedule,
    /// Beneficiary address, `None` for the bridge-released pool until the bridge is set
    pub address: Option<Addr>,
    pub state: VestingState,
    pub installment_value: Uint128,
    pub tokens_left: Uint128,
}
