use crate::contract::{execute, instantiate, query};
use cosmwasm_std::testing::{
    mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    from_json, to_json_binary, Addr, ContractResult, CosmosMsg, OwnedDeps, SystemResult, Uint128,
    WasmMsg, WasmQuery,
};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};
use cw_controllers::AdminError;
use distribution_base::error::ContractError;
use distribution_base::ledger_msg::{
    Cw20HookMsg, ExecuteMsg, InstantiateMsg, ParticipantInput, ParticipantResponse,
    ParticipantsResponse, QueryMsg,
};
use distribution_base::msg::PoolInfoResponse;
use distribution_base::schedule::pool_schedule;
use distribution_base::types::{LedgerState, ScheduleVariant, VestingState};

const OWNER: &str = "owner";
const DISTRIBUTION: &str = "distribution";
const TOKEN: &str = "token";
const PRIVATE_OFFERING: u8 = 3;

type Deps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

fn pool_stake() -> Uint128 {
    pool_schedule(ScheduleVariant::Genesis, PRIVATE_OFFERING)
        .unwrap()
        .stake
}

/// Makes the mocked distribution contract report `stake` and `address` for the ledger's pool.
fn mock_distribution(deps: &mut Deps, stake: Uint128, address: &str) {
    let address = Addr::unchecked(address);
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { contract_addr, .. } if contract_addr == DISTRIBUTION => {
            let mut schedule =
                pool_schedule(ScheduleVariant::Genesis, PRIVATE_OFFERING).unwrap();
            schedule.stake = stake;
            let response = PoolInfoResponse {
                installment_value: schedule.installment_value().unwrap(),
                tokens_left: stake,
                schedule,
                address: Some(address.clone()),
                state: VestingState::default(),
            };
            SystemResult::Ok(ContractResult::Ok(to_json_binary(&response).unwrap()))
        }
        _ => panic!("unexpected query: {:?}", query),
    });
}

fn exec(
    deps: &mut Deps,
    sender: &str,
    msg: ExecuteMsg,
) -> Result<cosmwasm_std::Response, ContractError> {
    execute(deps.as_mut(), mock_env(), mock_info(sender, &[]), msg)
}

fn setup() -> Deps {
    let mut deps = mock_dependencies();
    instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        InstantiateMsg {
            owner: OWNER.to_string(),
            pool: PRIVATE_OFFERING,
            variant: ScheduleVariant::Genesis,
        },
    )
    .unwrap();
    deps
}

fn participants(entries: &[(&str, u128)]) -> ExecuteMsg {
    ExecuteMsg::AddParticipants {
        participants: entries
            .iter()
            .map(|(address, stake)| ParticipantInput {
                address: address.to_string(),
                stake: Uint128::new(*stake),
            })
            .collect(),
    }
}

fn query_state(deps: &Deps) -> LedgerState {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::State {}).unwrap()).unwrap()
}

fn query_participant(deps: &Deps, address: &str) -> ParticipantResponse {
    from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Participant {
                address: address.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap()
}

fn release(amount: Uint128) -> ExecuteMsg {
    ExecuteMsg::Receive(Cw20ReceiveMsg {
        sender: DISTRIBUTION.to_string(),
        amount,
        msg: to_json_binary(&Cw20HookMsg::Release {}).unwrap(),
    })
}

#[test]
fn instantiate_accepts_only_multi_beneficiary_pools() {
    let mut deps = mock_dependencies();
    let err = instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        InstantiateMsg {
            owner: OWNER.to_string(),
            pool: 1,
            variant: ScheduleVariant::Genesis,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::WrongPool(1));

    let err = instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        InstantiateMsg {
            owner: OWNER.to_string(),
            pool: 7,
            variant: ScheduleVariant::Genesis,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::UnknownPool(7));

    // advisors reward is shared between participants in the extended generation
    instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        InstantiateMsg {
            owner: OWNER.to_string(),
            pool: 7,
            variant: ScheduleVariant::Extended,
        },
    )
    .unwrap();
}

#[test]
fn manage_participants() {
    let mut deps = setup();

    let err = exec(&mut deps, "alice", participants(&[("alice", 100)])).unwrap_err();
    assert_eq!(err, ContractError::Admin(AdminError::NotAdmin {}));

    exec(&mut deps, OWNER, participants(&[("alice", 100), ("bob", 200)])).unwrap();

    let err = exec(&mut deps, OWNER, participants(&[("carol", 5), ("alice", 1)])).unwrap_err();
    assert_eq!(err, ContractError::DuplicateParticipant("alice".to_string()));
    let err = exec(&mut deps, OWNER, participants(&[("carol", 0)])).unwrap_err();
    assert_eq!(err, ContractError::InvalidShare("carol".to_string()));
    let err = exec(&mut deps, OWNER, participants(&[("", 10)])).unwrap_err();
    assert_eq!(err, ContractError::InvalidAddress("".to_string()));
    let err = exec(&mut deps, OWNER, participants(&[])).unwrap_err();
    assert_eq!(err, ContractError::NoParticipants {});

    // failed batches leave no trace
    let state = query_state(&deps);
    assert_eq!(state.participant_count, 2);
    assert_eq!(state.total_shares, Uint128::new(300));

    exec(
        &mut deps,
        OWNER,
        ExecuteMsg::EditParticipant {
            address: "bob".to_string(),
            stake: Uint128::new(250),
        },
    )
    .unwrap();
    let err = exec(
        &mut deps,
        OWNER,
        ExecuteMsg::EditParticipant {
            address: "dave".to_string(),
            stake: Uint128::new(250),
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::NotFound("dave".to_string()));
    let err = exec(
        &mut deps,
        OWNER,
        ExecuteMsg::EditParticipant {
            address: "bob".to_string(),
            stake: Uint128::zero(),
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::InvalidShare("bob".to_string()));
    assert_eq!(query_state(&deps).total_shares, Uint128::new(350));

    exec(
        &mut deps,
        OWNER,
        ExecuteMsg::RemoveParticipant {
            address: "alice".to_string(),
        },
    )
    .unwrap();

    let state = query_state(&deps);
    assert_eq!(state.participant_count, 1);
    assert_eq!(state.total_shares, Uint128::new(250));

    let res: ParticipantsResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Participants {
                start_after: None,
                limit: None,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(res.participants.len(), 1);
    assert_eq!(res.participants[0].address, Addr::unchecked("bob"));
    assert_eq!(res.participants[0].stake, Uint128::new(250));

    let err = exec(
        &mut deps,
        OWNER,
        participants(&[("whale", pool_stake().u128())]),
    )
    .unwrap_err();
    assert_eq!(err, ContractError::ExceedsPoolStake {});

    exec(&mut deps, OWNER, ExecuteMsg::FinalizeParticipants {}).unwrap();
    let state = query_state(&deps);
    assert!(state.finalized);
    assert_eq!(state.burn.stake, pool_stake() - Uint128::new(250));

    let err = exec(&mut deps, OWNER, participants(&[("carol", 5)])).unwrap_err();
    assert_eq!(err, ContractError::AlreadyFinalized {});
    let err = exec(&mut deps, OWNER, ExecuteMsg::FinalizeParticipants {}).unwrap_err();
    assert_eq!(err, ContractError::AlreadyFinalized {});
}

#[test]
fn distribution_address_is_verified() {
    let mut deps = setup();
    let set = ExecuteMsg::SetDistributionAddress {
        distribution: DISTRIBUTION.to_string(),
    };

    let err = exec(&mut deps, "alice", set.clone()).unwrap_err();
    assert_eq!(err, ContractError::Admin(AdminError::NotAdmin {}));

    let ledger = mock_env().contract.address;
    mock_distribution(&mut deps, Uint128::new(42), ledger.as_str());
    let err = exec(&mut deps, OWNER, set.clone()).unwrap_err();
    assert_eq!(
        err,
        ContractError::PoolStakeMismatch {
            expected: pool_stake(),
            actual: Uint128::new(42),
        }
    );

    // the pool is released to another contract
    mock_distribution(&mut deps, pool_stake(), "another_ledger");
    let err = exec(&mut deps, OWNER, set.clone()).unwrap_err();
    assert_eq!(err, ContractError::WrongPoolAddress(PRIVATE_OFFERING));

    mock_distribution(&mut deps, pool_stake(), ledger.as_str());
    exec(&mut deps, OWNER, set.clone()).unwrap();
    let err = exec(&mut deps, OWNER, set).unwrap_err();
    assert_eq!(err, ContractError::DistributionAlreadySet {});
}

#[test]
fn initialize_release_and_withdraw() {
    let mut deps = setup();
    let initialize = ExecuteMsg::Initialize {
        token: TOKEN.to_string(),
    };

    let err = exec(&mut deps, DISTRIBUTION, initialize.clone()).unwrap_err();
    assert_eq!(err, ContractError::DistributionNotSet {});

    let ledger = mock_env().contract.address;
    mock_distribution(&mut deps, pool_stake(), ledger.as_str());
    exec(
        &mut deps,
        OWNER,
        ExecuteMsg::SetDistributionAddress {
            distribution: DISTRIBUTION.to_string(),
        },
    )
    .unwrap();
    exec(
        &mut deps,
        OWNER,
        participants(&[("alice", 1_000_000), ("bob", 3_000_000)]),
    )
    .unwrap();

    let err = exec(&mut deps, DISTRIBUTION, initialize.clone()).unwrap_err();
    assert_eq!(err, ContractError::NotFinalized {});
    exec(&mut deps, OWNER, ExecuteMsg::FinalizeParticipants {}).unwrap();

    let err = exec(&mut deps, OWNER, initialize.clone()).unwrap_err();
    assert_eq!(err, ContractError::Unauthorized {});
    exec(&mut deps, DISTRIBUTION, initialize.clone()).unwrap();
    let err = exec(&mut deps, DISTRIBUTION, initialize).unwrap_err();
    assert_eq!(err, ContractError::AlreadyInitialized {});

    // a quarter of the pool stake
    let released = pool_stake().multiply_ratio(1u128, 4u128);

    let err = exec(&mut deps, "fake_token", release(released)).unwrap_err();
    assert_eq!(err, ContractError::Unauthorized {});
    let err = exec(
        &mut deps,
        TOKEN,
        ExecuteMsg::Receive(Cw20ReceiveMsg {
            sender: "alice".to_string(),
            amount: released,
            msg: to_json_binary(&Cw20HookMsg::Release {}).unwrap(),
        }),
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Unauthorized {});

    exec(&mut deps, TOKEN, release(released)).unwrap();
    assert_eq!(query_state(&deps).total_released, released);

    let alice = query_participant(&deps, "alice");
    assert_eq!(alice.available, Uint128::new(250_000));

    let res = exec(&mut deps, "alice", ExecuteMsg::Withdraw {}).unwrap();
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: TOKEN.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: "alice".to_string(),
                amount: Uint128::new(250_000),
            })
            .unwrap(),
            funds: vec![],
        })
    );

    let alice = query_participant(&deps, "alice");
    assert_eq!(alice.paid, Uint128::new(250_000));
    assert_eq!(alice.available, Uint128::zero());

    let err = exec(&mut deps, "alice", ExecuteMsg::Withdraw {}).unwrap_err();
    assert_eq!(err, ContractError::NoFundsAvailable {});
    let err = exec(&mut deps, "carol", ExecuteMsg::Withdraw {}).unwrap_err();
    assert_eq!(err, ContractError::NotAParticipant("carol".to_string()));

    let err = exec(&mut deps, "alice", ExecuteMsg::Burn {}).unwrap_err();
    assert_eq!(err, ContractError::Admin(AdminError::NotAdmin {}));

    let res = exec(&mut deps, OWNER, ExecuteMsg::Burn {}).unwrap();
    let burn_stake = pool_stake() - Uint128::new(4_000_000);
    let burned = released.multiply_ratio(burn_stake, pool_stake());
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: TOKEN.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Burn { amount: burned }).unwrap(),
            funds: vec![],
        })
    );

    // the whole release is accounted for once bob withdraws
    exec(&mut deps, "bob", ExecuteMsg::Withdraw {}).unwrap();
    let bob = query_participant(&deps, "bob");
    assert_eq!(bob.paid, Uint128::new(750_000));
    assert_eq!(Uint128::new(1_000_000) + burned, released);
}
