use crate::types::{LedgerConfig, LedgerState, ScheduleVariant, ShareAccount};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use cw20::Cw20ReceiveMsg;
use cw_controllers::AdminResponse;

/// This structure describes the parameters used for creating a multiple-distribution
/// contract.
#[cw_serde]
pub struct InstantiateMsg {
    /// Address allowed to manage participants and burn the unallocated remainder
    pub owner: String,
    /// Multi-beneficiary pool served by this contract
    pub pool: u8,
    /// Pool table the pool stake is taken from
    pub variant: ScheduleVariant,
}

#[cw_serde]
pub struct ParticipantInput {
    pub address: String,
    pub stake: Uint128,
}

/// This structure describes the execute messages available in a multiple-distribution
/// contract.
#[cw_serde]
pub enum ExecuteMsg {
    /// Binds the contract to the distribution contract releasing the pool
    /// ## Executor
    /// Only the owner can execute this, once
    SetDistributionAddress { distribution: String },
    /// Registers participants
    /// ## Executor
    /// Only the owner can execute this before finalization
    AddParticipants { participants: Vec<ParticipantInput> },
    /// Changes the stake of a participant
    /// ## Executor
    /// Only the owner can execute this before finalization
    EditParticipant { address: String, stake: Uint128 },
    /// Removes a participant
    /// ## Executor
    /// Only the owner can execute this before finalization
    RemoveParticipant { address: String },
    /// Freezes the participant set
    /// ## Executor
    /// Only the owner can execute this, once
    FinalizeParticipants {},
    /// Sets the distributed token
    /// ## Executor
    /// Only the distribution contract can execute this, once, after finalization
    Initialize { token: String },
    /// Receives released tokens from the distribution contract
    Receive(Cw20ReceiveMsg),
    /// Transfers the released share of the sender
    /// ## Executor
    /// Any registered participant
    Withdraw {},
    /// Burns the released share of the unallocated remainder
    /// ## Executor
    /// Only the owner can execute this
    Burn {},
    /// Transfers contract ownership
    /// ## Executor
    /// Only the owner can execute this
    UpdateOwner { owner: String },
}

/// This structure describes a CW20 hook message.
#[cw_serde]
pub enum Cw20HookMsg {
    /// Raises the released watermark by the received amount
    Release {},
}

/// This structure describes the query messages available in a multiple-distribution
/// contract.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LedgerConfig)]
    Config {},
    #[returns(AdminResponse)]
    Owner {},
    /// Returns the aggregate ledger state.
    #[returns(LedgerState)]
    State {},
    /// Returns stake, withdrawn and withdrawable amounts of a participant.
    #[returns(ParticipantResponse)]
    Participant { address: String },
    /// Returns a page of participants in ascending address order.
    #[returns(ParticipantsResponse)]
    Participants {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns stake and burned amount of the unallocated remainder.
    #[returns(ShareAccount)]
    BurnShare {},
}

#[cw_serde]
pub struct ParticipantResponse {
    pub address: Addr,
    pub stake: Uint128,
    pub paid: Uint128,
    pub available: Uint128,
}

#[cw_serde]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantResponse>,
}

/// This structure describes a migration message.
/// We currently take no arguments for migrations.
#[cw_serde]
pub struct MigrateMsg {}
