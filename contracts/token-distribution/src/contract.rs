#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response, Uint128,
    WasmMsg,
};
use cw2::set_contract_version;
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use distribution_base::accountant::{
    compute_newly_unlocked, due_amount, release_prepayment, tokens_left, Timeline,
};
use distribution_base::error::ContractError;
use distribution_base::ledger_msg::{Cw20HookMsg, ExecuteMsg as LedgerExecuteMsg};
use distribution_base::msg::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, PoolInfoResponse, QueryMsg,
};
use distribution_base::schedule::{pool_schedule, pool_schedules, total_supply, validate_variant};
use distribution_base::types::{BeneficiaryKind, Config, PoolSchedule, VestingState};

use crate::state::{CONFIG, OWNER, POOL_ADDRESSES, POOL_STATES};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "crates.io:token-distribution";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a new contract with the specified parameters packed in the `msg` variable.
/// Every pool except the bridge-released one must get exactly one address.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.staking_epoch_duration == 0 {
        return Err(ContractError::InvalidEpochDuration {});
    }
    validate_variant(msg.variant)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    OWNER.set(deps.branch(), Some(owner.clone()))?;

    for entry in msg.pool_addresses {
        let schedule = pool_schedule(msg.variant, entry.pool)?;
        if schedule.beneficiary == BeneficiaryKind::Bridge {
            return Err(ContractError::PoolAddressLocked(entry.pool));
        }
        if POOL_ADDRESSES.has(deps.storage, entry.pool) {
            return Err(ContractError::DuplicatePoolAddress(entry.pool));
        }
        let address = deps.api.addr_validate(&entry.address)?;
        POOL_ADDRESSES.save(deps.storage, entry.pool, &address)?;
    }

    for schedule in pool_schedules(msg.variant) {
        let pool = schedule.pool.as_u8();
        if schedule.beneficiary != BeneficiaryKind::Bridge
            && !POOL_ADDRESSES.has(deps.storage, pool)
        {
            return Err(ContractError::MissingPoolAddress(pool));
        }
    }

    CONFIG.save(
        deps.storage,
        &Config {
            token: None,
            staking_epoch_duration: msg.staking_epoch_duration,
            variant: msg.variant,
            distribution_start_timestamp: None,
            bridge_address: None,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute(
            "staking_epoch_duration",
            msg.staking_epoch_duration.to_string(),
        ))
}

/// Exposes execute functions available in the contract.
///
/// ## Variants
/// * **ExecuteMsg::Initialize { token }** Fixes the distribution start and releases
/// everything due at the start.
///
/// * **ExecuteMsg::MakeInstallment { pool }** Releases what is due for a pool.
///
/// * **ExecuteMsg::ChangePoolAddress { pool, address }** Changes a pool beneficiary.
///
/// * **ExecuteMsg::SetBridgeAddress { address }** Sets the reward for staking receiver.
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
        ExecuteMsg::Initialize { token } => execute_initialize(deps, env, info, token),
        ExecuteMsg::MakeInstallment { pool } => execute_make_installment(deps, env, info, pool),
        ExecuteMsg::ChangePoolAddress { pool, address } => {
            execute_change_pool_address(deps, info, pool, address)
        }
        ExecuteMsg::SetBridgeAddress { address } => {
            execute_set_bridge_address(deps, info, address)
        }
        ExecuteMsg::UpdateOwner { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(OWNER.execute_update_admin(deps, info, Some(owner))?)
        }
    }
}

fn execute_initialize(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if config.distribution_start_timestamp.is_some() {
        return Err(ContractError::AlreadyInitialized {});
    }

    let token = deps.api.addr_validate(&token)?;
    let balance: BalanceResponse = deps.querier.query_wasm_smart(
        &token,
        &Cw20QueryMsg::Balance {
            address: env.contract.address.to_string(),
        },
    )?;
    let expected = total_supply(config.variant);
    if balance.balance != expected {
        return Err(ContractError::WrongBalance {
            expected,
            actual: balance.balance,
        });
    }

    let now = env.block.time.seconds();
    config.token = Some(token.clone());
    config.distribution_start_timestamp = Some(now);
    CONFIG.save(deps.storage, &config)?;
    let timeline = Timeline::new(now, config.staking_epoch_duration)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut attrs = vec![
        attr("action", "initialize"),
        attr("token", &token),
        attr("distribution_start_timestamp", now.to_string()),
    ];

    for schedule in pool_schedules(config.variant) {
        let pool = schedule.pool.as_u8();
        let mut state = VestingState::default();
        let mut released = release_prepayment(&schedule, &mut state)?;
        if schedule.cliff == 0 {
            let release = compute_newly_unlocked(&schedule, &mut state, &timeline, now)?;
            released = released.checked_add(release.value)?;
        }
        POOL_STATES.save(deps.storage, pool, &state)?;

        // the ledger has to know the token before it receives anything
        if schedule.beneficiary == BeneficiaryKind::Participants {
            let ledger = POOL_ADDRESSES.load(deps.storage, pool)?;
            messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: ledger.to_string(),
                msg: to_json_binary(&LedgerExecuteMsg::Initialize {
                    token: token.to_string(),
                })?,
                funds: vec![],
            }));
        }

        if !released.is_zero() {
            deps.api.debug(
                format!(
                    "WASMDEBUG: initialize: releasing {} of pool {}",
                    released, schedule.pool
                )
                .as_str(),
            );
            messages.push(release_message(deps.as_ref(), &config, &schedule, released)?);
            attrs.push(attr(schedule.pool.as_str(), released));
        }
    }

    Ok(Response::new().add_messages(messages).add_attributes(attrs))
}

fn execute_make_installment(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool: u8,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let distribution_start = config
        .distribution_start_timestamp
        .ok_or(ContractError::NotInitialized {})?;
    let schedule = pool_schedule(config.variant, pool)?;
    let timeline = Timeline::new(distribution_start, config.staking_epoch_duration)?;
    let now = env.block.time.seconds();

    let mut state = POOL_STATES.load(deps.storage, pool)?;
    let release = compute_newly_unlocked(&schedule, &mut state, &timeline, now)?;

    let mut response = Response::new();
    if !release.value.is_zero() {
        response = response.add_message(release_message(
            deps.as_ref(),
            &config,
            &schedule,
            release.value,
        )?);
    }
    POOL_STATES.save(deps.storage, pool, &state)?;

    deps.api.debug(
        format!(
            "WASMDEBUG: make_installment: pool {} released {}, cumulative {}",
            schedule.pool, release.value, state.cumulative_released
        )
        .as_str(),
    );

    Ok(response.add_attributes(vec![
        attr("action", "make_installment"),
        attr("pool", pool.to_string()),
        attr("value", release.value),
        attr("caller", &info.sender),
        attr("timestamp", now.to_string()),
        attr("installments_ended", release.installments_ended.to_string()),
    ]))
}

fn execute_change_pool_address(
    deps: DepsMut,
    info: MessageInfo,
    pool: u8,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let schedule = pool_schedule(config.variant, pool)?;

    let locked = match schedule.beneficiary {
        BeneficiaryKind::Single => false,
        BeneficiaryKind::Participants => config.distribution_start_timestamp.is_some(),
        BeneficiaryKind::Bridge => true,
    };
    if locked {
        return Err(ContractError::PoolAddressLocked(pool));
    }

    let old_address = POOL_ADDRESSES.load(deps.storage, pool)?;
    if info.sender != old_address && !OWNER.is_admin(deps.as_ref(), &info.sender)? {
        return Err(ContractError::Unauthorized {});
    }

    let new_address = deps.api.addr_validate(&address)?;
    POOL_ADDRESSES.save(deps.storage, pool, &new_address)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "change_pool_address"),
        attr("pool", pool.to_string()),
        attr("old_address", old_address),
        attr("new_address", new_address),
    ]))
}

fn execute_set_bridge_address(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    OWNER.assert_admin(deps.as_ref(), &info.sender)?;

    let bridge = deps.api.addr_validate(&address)?;
    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.bridge_address = Some(bridge.clone());
        Ok(config)
    })?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "set_bridge_address"),
        attr("bridge_address", bridge),
    ]))
}

/// Builds the token message delivering `amount` of a pool to its beneficiary.
/// Multi-beneficiary pools receive it through the CW20 receive hook so the ledger
/// can raise its watermark in the same transaction.
fn release_message(
    deps: Deps,
    config: &Config,
    schedule: &PoolSchedule,
    amount: Uint128,
) -> Result<CosmosMsg, ContractError> {
    let token = config.token.as_ref().ok_or(ContractError::NotInitialized {})?;
    let pool = schedule.pool.as_u8();

    let msg = match schedule.beneficiary {
        BeneficiaryKind::Single => Cw20ExecuteMsg::Transfer {
            recipient: POOL_ADDRESSES.load(deps.storage, pool)?.to_string(),
            amount,
        },
        BeneficiaryKind::Participants => Cw20ExecuteMsg::Send {
            contract: POOL_ADDRESSES.load(deps.storage, pool)?.to_string(),
            amount,
            msg: to_json_binary(&Cw20HookMsg::Release {})?,
        },
        BeneficiaryKind::Bridge => Cw20ExecuteMsg::Transfer {
            recipient: config
                .bridge_address
                .as_ref()
                .ok_or(ContractError::BridgeNotSet {})?
                .to_string(),
            amount,
        },
    };

    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![],
    }))
}

/// Exposes all the queries available in the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?)?,
        QueryMsg::Owner {} => to_json_binary(&OWNER.query_admin(deps)?)?,
        QueryMsg::DistributionStartTimestamp {} => {
            to_json_binary(&CONFIG.load(deps.storage)?.distribution_start_timestamp)?
        }
        QueryMsg::PoolInfo { pool } => to_json_binary(&query_pool_info(deps, pool)?)?,
        QueryMsg::TokensLeft { pool } => {
            to_json_binary(&query_pool_info(deps, pool)?.tokens_left)?
        }
        QueryMsg::CumulativeReleased { pool } => {
            to_json_binary(&query_pool_info(deps, pool)?.state.cumulative_released)?
        }
        QueryMsg::DueAmount { pool } => to_json_binary(&query_due_amount(deps, env, pool)?)?,
    };
    Ok(response)
}

fn query_pool_info(deps: Deps, pool: u8) -> Result<PoolInfoResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let schedule = pool_schedule(config.variant, pool)?;
    let state = POOL_STATES
        .may_load(deps.storage, pool)?
        .unwrap_or_default();

    let address = match schedule.beneficiary {
        BeneficiaryKind::Bridge => config.bridge_address,
        _ => POOL_ADDRESSES.may_load(deps.storage, pool)?,
    };
    let installment_value = schedule.installment_value()?;
    let tokens_left = tokens_left(&schedule, &state)?;

    Ok(PoolInfoResponse {
        schedule,
        address,
        state,
        installment_value,
        tokens_left,
    })
}

fn query_due_amount(deps: Deps, env: Env, pool: u8) -> Result<Uint128, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let schedule = pool_schedule(config.variant, pool)?;
    let distribution_start = match config.distribution_start_timestamp {
        Some(start) => start,
        None => return Ok(Uint128::zero()),
    };

    let state = POOL_STATES.load(deps.storage, pool)?;
    let timeline = Timeline::new(distribution_start, config.staking_epoch_duration)?;
    due_amount(&schedule, &state, &timeline, env.block.time.seconds())
}

/// Used for contract migration. Returns a default object of type [`Response`].
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}
