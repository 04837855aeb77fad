#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, from_json, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Response, Uint128, WasmMsg,
};
use cw2::set_contract_version;
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};
use distribution_base::error::ContractError;
use distribution_base::ledger::{entitlement, ParticipantLedger};
use distribution_base::ledger_msg::{
    Cw20HookMsg, ExecuteMsg, InstantiateMsg, MigrateMsg, ParticipantInput, ParticipantResponse,
    ParticipantsResponse, QueryMsg,
};
use distribution_base::msg::{PoolInfoResponse, QueryMsg as DistributionQueryMsg};
use distribution_base::schedule::pool_schedule;
use distribution_base::types::{BeneficiaryKind, LedgerConfig, LedgerState, Participant};

use crate::state::{CONFIG, LEDGER, OWNER};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "crates.io:multiple-distribution";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let schedule = pool_schedule(msg.variant, msg.pool)?;
    if schedule.beneficiary != BeneficiaryKind::Participants {
        return Err(ContractError::WrongPool(msg.pool));
    }

    let owner = deps.api.addr_validate(&msg.owner)?;
    OWNER.set(deps.branch(), Some(owner.clone()))?;

    CONFIG.save(
        deps.storage,
        &LedgerConfig {
            pool: schedule.pool,
            variant: msg.variant,
            distribution: None,
            token: None,
        },
    )?;
    LEDGER.instantiate(deps.storage, schedule.stake)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "instantiate"),
        attr("owner", owner),
        attr("pool", schedule.pool.as_str()),
        attr("pool_stake", schedule.stake),
    ]))
}

/// Exposes execute functions available in the contract.
///
/// ## Variants
/// * **ExecuteMsg::SetDistributionAddress { distribution }** Binds the ledger to the
/// distribution contract.
///
/// * **ExecuteMsg::AddParticipants { participants }** Registers participants.
///
/// * **ExecuteMsg::EditParticipant { address, stake }** Changes a participant stake.
///
/// * **ExecuteMsg::RemoveParticipant { address }** Removes a participant.
///
/// * **ExecuteMsg::FinalizeParticipants {}** Freezes the participant set.
///
/// * **ExecuteMsg::Initialize { token }** Sets the distributed token.
///
/// * **ExecuteMsg::Receive(msg)** Receives released tokens.
///
/// * **ExecuteMsg::Withdraw {}** Transfers the released share of the sender.
///
/// * **ExecuteMsg::Burn {}** Burns the released share of the unallocated remainder.
///
/// * **ExecuteMsg::UpdateOwner { owner }** Transfers contract ownership.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    deps.api
        .debug(format!("WASMDEBUG: execute: received msg: {:?}", msg).as_str());
    match msg {
        ExecuteMsg::SetDistributionAddress { distribution } => {
            execute_set_distribution_address(deps, env, info, distribution)
        }
        ExecuteMsg::AddParticipants { participants } => {
            execute_add_participants(deps, info, participants)
        }
        ExecuteMsg::EditParticipant { address, stake } => {
            execute_edit_participant(deps, info, address, stake)
        }
        ExecuteMsg::RemoveParticipant { address } => {
            execute_remove_participant(deps, info, address)
        }
        ExecuteMsg::FinalizeParticipants {} => execute_finalize_participants(deps, info),
        ExecuteMsg::Initialize { token } => execute_initialize(deps, info, token),
        ExecuteMsg::Receive(msg) => receive_cw20(deps, env, info, msg),
        ExecuteMsg::Withdraw {} => execute_withdraw(deps, info),
        ExecuteMsg::Burn {} => execute_burn(deps, info),
        ExecuteMsg::UpdateOwner { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(OWNER.execute_update_admin(deps, info, Some(owner))?)
        }
    }
}

fn validate_participant(deps: Deps, address: &str) -> Result<Addr, ContractError> {
    deps.api
        .addr_validate(address)
        .map_err(|_| ContractError::InvalidAddress(address.to_string()))
}

fn execute_set_distribution_address(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    distribution: String,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if config.distribution.is_some() {
        return Err(ContractError::DistributionAlreadySet {});
    }
    let distribution = deps.api.addr_validate(&distribution)?;

    // the distribution contract must release the same pool this ledger was set up for
    let pool_info: PoolInfoResponse = deps.querier.query_wasm_smart(
        &distribution,
        &DistributionQueryMsg::PoolInfo {
            pool: config.pool.as_u8(),
        },
    )?;
    let state = LEDGER.load_state(deps.storage)?;
    if pool_info.schedule.stake != state.pool_stake {
        return Err(ContractError::PoolStakeMismatch {
            expected: state.pool_stake,
            actual: pool_info.schedule.stake,
        });
    }
    if pool_info.address != Some(env.contract.address) {
        return Err(ContractError::WrongPoolAddress(config.pool.as_u8()));
    }

    config.distribution = Some(distribution.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_distribution_address"),
        attr("distribution", distribution),
    ]))
}

fn execute_add_participants(
    deps: DepsMut,
    info: MessageInfo,
    participants: Vec<ParticipantInput>,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let entries = participants
        .into_iter()
        .map(|p| Ok((validate_participant(deps.as_ref(), &p.address)?, p.stake)))
        .collect::<Result<Vec<_>, ContractError>>()?;
    let added = entries.len();
    let state = LEDGER.add_participants(deps.storage, entries)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "add_participants"),
        attr("added", added.to_string()),
        attr("participant_count", state.participant_count.to_string()),
        attr("total_shares", state.total_shares),
    ]))
}

fn execute_edit_participant(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
    stake: Uint128,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let address = validate_participant(deps.as_ref(), &address)?;
    let old_stake = LEDGER.edit_participant(deps.storage, &address, stake)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "edit_participant"),
        attr("address", address),
        attr("old_stake", old_stake),
        attr("new_stake", stake),
    ]))
}

fn execute_remove_participant(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let address = validate_participant(deps.as_ref(), &address)?;
    let stake = LEDGER.remove_participant(deps.storage, &address)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "remove_participant"),
        attr("address", address),
        attr("stake", stake),
    ]))
}

fn execute_finalize_participants(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let state = LEDGER.finalize(deps.storage)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "finalize_participants"),
        attr("participant_count", state.participant_count.to_string()),
        attr(
            "number_of_accounts",
            ParticipantLedger::number_of_accounts(&state).to_string(),
        ),
        attr("total_shares", state.total_shares),
        attr("burn_stake", state.burn.stake),
    ]))
}

fn execute_initialize(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    assert_distribution(&config, &info.sender)?;
    if config.token.is_some() {
        return Err(ContractError::AlreadyInitialized {});
    }
    if !LEDGER.load_state(deps.storage)?.finalized {
        return Err(ContractError::NotFinalized {});
    }

    let token = deps.api.addr_validate(&token)?;
    config.token = Some(token.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "initialize"),
        attr("token", token),
    ]))
}

fn assert_distribution(config: &LedgerConfig, sender: &Addr) -> Result<(), ContractError> {
    match &config.distribution {
        None => Err(ContractError::DistributionNotSet {}),
        Some(distribution) if distribution != sender => Err(ContractError::Unauthorized {}),
        Some(_) => Ok(()),
    }
}

/// Accepts released tokens. Only the distributed token sent by the distribution
/// contract raises the watermark.
pub fn receive_cw20(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.token.as_ref() != Some(&info.sender) {
        return Err(ContractError::Unauthorized {});
    }
    let sender = deps.api.addr_validate(&cw20_msg.sender)?;
    assert_distribution(&config, &sender)?;

    match from_json(&cw20_msg.msg)? {
        Cw20HookMsg::Release {} => {
            let watermark = LEDGER.record_release(deps.storage, cw20_msg.amount)?;
            deps.api.debug(
                format!(
                    "WASMDEBUG: release: received {}, watermark {}",
                    cw20_msg.amount, watermark
                )
                .as_str(),
            );

            Ok(Response::new().add_attributes(vec![
                attr("action", "release"),
                attr("amount", cw20_msg.amount),
                attr("total_released", watermark),
            ]))
        }
    }
}

fn execute_withdraw(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let token = config.token.ok_or(ContractError::NotInitialized {})?;

    let value = LEDGER.withdraw(deps.storage, &info.sender)?;

    Ok(Response::new()
        .add_message(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: info.sender.to_string(),
                amount: value,
            })?,
            funds: vec![],
        }))
        .add_attributes(vec![
            attr("action", "withdraw"),
            attr("participant", &info.sender),
            attr("amount", value),
        ]))
}

fn execute_burn(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    let token = config.token.ok_or(ContractError::NotInitialized {})?;

    let value = LEDGER.burn(deps.storage)?;

    Ok(Response::new()
        .add_message(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Burn { amount: value })?,
            funds: vec![],
        }))
        .add_attributes(vec![attr("action", "burn"), attr("amount", value)]))
}

/// Exposes all the queries available in the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?)?,
        QueryMsg::Owner {} => to_json_binary(&OWNER.query_admin(deps)?)?,
        QueryMsg::State {} => to_json_binary(&LEDGER.load_state(deps.storage)?)?,
        QueryMsg::Participant { address } => {
            to_json_binary(&query_participant(deps, address)?)?
        }
        QueryMsg::Participants { start_after, limit } => {
            to_json_binary(&query_participants(deps, start_after, limit)?)?
        }
        QueryMsg::BurnShare {} => to_json_binary(&LEDGER.load_state(deps.storage)?.burn)?,
    };
    Ok(response)
}

fn participant_response(
    state: &LedgerState,
    address: Addr,
    participant: Participant,
) -> ParticipantResponse {
    let available = entitlement(state.total_released, participant.stake, state.pool_stake)
        .saturating_sub(participant.paid);
    ParticipantResponse {
        address,
        stake: participant.stake,
        paid: participant.paid,
        available,
    }
}

fn query_participant(deps: Deps, address: String) -> Result<ParticipantResponse, ContractError> {
    let address = validate_participant(deps, &address)?;
    let state = LEDGER.load_state(deps.storage)?;
    let participant = LEDGER
        .participants
        .may_load(deps.storage, &address)?
        .ok_or_else(|| ContractError::NotAParticipant(address.to_string()))?;
    Ok(participant_response(&state, address, participant))
}

fn query_participants(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> Result<ParticipantsResponse, ContractError> {
    let start_after = start_after
        .map(|address| validate_participant(deps, &address))
        .transpose()?;
    let state = LEDGER.load_state(deps.storage)?;

    let participants = LEDGER
        .read_participants(deps.storage, start_after, limit)?
        .into_iter()
        .map(|(address, participant)| participant_response(&state, address, participant))
        .collect();
    Ok(ParticipantsResponse { participants })
}

/// Used for contract migration. Returns a default object of type [`Response`].
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
