use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_controllers::AdminError;
use thiserror::Error;

/// This enum describes token distribution contract errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Admin(#[from] AdminError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Distribution is not initialized")]
    NotInitialized {},

    #[error("Distribution is already initialized")]
    AlreadyInitialized {},

    #[error("Unknown pool: {0}")]
    UnknownPool(u8),

    #[error("Installments are not active for pool {pool}: the cliff is not reached")]
    NotYetActive { pool: u8 },

    #[error("Installments are not active for pool {pool}: the whole stake is released")]
    PoolInactive { pool: u8 },

    #[error("No installments available for pool {pool}")]
    NothingDue { pool: u8 },

    #[error("Invalid schedule for pool {0}")]
    InvalidSchedule(u8),

    #[error("Staking epoch duration must be more than 0")]
    InvalidEpochDuration {},

    #[error("Address of pool {0} is missing")]
    MissingPoolAddress(u8),

    #[error("Address of pool {0} is given more than once")]
    DuplicatePoolAddress(u8),

    #[error("Address of pool {0} is not configurable")]
    PoolAddressLocked(u8),

    #[error("Wrong contract balance: expected {expected}, got {actual}")]
    WrongBalance { expected: Uint128, actual: Uint128 },

    #[error("Bridge address is not set")]
    BridgeNotSet {},

    #[error("No participants to add")]
    NoParticipants {},

    #[error("Participant {0} is already added")]
    DuplicateParticipant(String),

    #[error("Stake of participant {0} must be more than 0")]
    InvalidShare(String),

    #[error("Invalid participant address: {0}")]
    InvalidAddress(String),

    #[error("Sum of participant stakes exceeds the pool stake")]
    ExceedsPoolStake {},

    #[error("Participant {0} is not found")]
    NotFound(String),

    #[error("Participants are already finalized")]
    AlreadyFinalized {},

    #[error("Participants are not finalized")]
    NotFinalized {},

    #[error("No tokens available to withdraw")]
    NoFundsAvailable {},

    #[error("{0} is not a participant")]
    NotAParticipant(String),

    #[error("Pool {0} is not a multi-beneficiary pool")]
    WrongPool(u8),

    #[error("Distribution address is already set")]
    DistributionAlreadySet {},

    #[error("Distribution address is not set")]
    DistributionNotSet {},

    #[error("Distribution releases pool {0} to another address")]
    WrongPoolAddress(u8),

    #[error("Pool stake mismatch: ledger has {expected}, distribution reports {actual}")]
    PoolStakeMismatch { expected: Uint128, actual: Uint128 },
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
