use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Item, Map};

use crate::error::ContractError;
use crate::types::{LedgerState, Participant, ShareAccount};

const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

/// Registry of the participants of a multi-beneficiary pool and their settlement
/// against the cumulative amount released into the pool.
///
/// Participants are kept in a dense slot index next to the address map, so removing
/// one swaps the last slot into the freed position.
pub struct ParticipantLedger<'a> {
    /// Participant data keyed by address
    pub participants: Map<'a, &'a Addr, Participant>,
    /// Dense index of participant addresses
    pub slots: Map<'a, u32, Addr>,
    /// Aggregate ledger state
    pub state: Item<'a, LedgerState>,
}

impl Default for ParticipantLedger<'static> {
    fn default() -> Self {
        ParticipantLedger::new("participants", "participant_slots", "ledger_state")
    }
}

/// Share of `watermark` a stake of `stake` out of `pool_stake` is entitled to.
/// The product is computed at full width before the division.
pub fn entitlement(watermark: Uint128, stake: Uint128, pool_stake: Uint128) -> Uint128 {
    if pool_stake.is_zero() {
        return Uint128::zero();
    }
    watermark.multiply_ratio(stake, pool_stake)
}

impl<'a> ParticipantLedger<'a> {
    pub const fn new(participants: &'a str, slots: &'a str, state: &'a str) -> Self {
        ParticipantLedger {
            participants: Map::new(participants),
            slots: Map::new(slots),
            state: Item::new(state),
        }
    }

    pub fn instantiate(&self, storage: &mut dyn Storage, pool_stake: Uint128) -> StdResult<()> {
        self.state.save(
            storage,
            &LedgerState {
                pool_stake,
                total_shares: Uint128::zero(),
                total_released: Uint128::zero(),
                participant_count: 0,
                finalized: false,
                burn: ShareAccount::default(),
            },
        )
    }

    pub fn load_state(&self, storage: &dyn Storage) -> StdResult<LedgerState> {
        self.state.load(storage)
    }

    fn load_registering(&self, storage: &dyn Storage) -> Result<LedgerState, ContractError> {
        let state = self.state.load(storage)?;
        if state.finalized {
            return Err(ContractError::AlreadyFinalized {});
        }
        Ok(state)
    }

    /// Registers new participants. Fails as a whole if any entry is invalid.
    pub fn add_participants(
        &self,
        storage: &mut dyn Storage,
        entries: Vec<(Addr, Uint128)>,
    ) -> Result<LedgerState, ContractError> {
        let mut state = self.load_registering(storage)?;
        if entries.is_empty() {
            return Err(ContractError::NoParticipants {});
        }

        // nothing is written until the whole batch is checked
        for (i, (address, stake)) in entries.iter().enumerate() {
            if address.as_str().is_empty() {
                return Err(ContractError::InvalidAddress(address.to_string()));
            }
            if stake.is_zero() {
                return Err(ContractError::InvalidShare(address.to_string()));
            }
            if self.participants.has(storage, address)
                || entries[..i].iter().any(|(seen, _)| seen == address)
            {
                return Err(ContractError::DuplicateParticipant(address.to_string()));
            }

            state.total_shares = state.total_shares.checked_add(*stake)?;
            if state.total_shares > state.pool_stake {
                return Err(ContractError::ExceedsPoolStake {});
            }
        }

        for (address, stake) in entries {
            let slot = state.participant_count;
            self.slots.save(storage, slot, &address)?;
            self.participants.save(
                storage,
                &address,
                &Participant {
                    stake,
                    paid: Uint128::zero(),
                    slot,
                },
            )?;
            state.participant_count += 1;
        }

        self.state.save(storage, &state)?;
        Ok(state)
    }

    /// Changes the stake of a registered participant and returns the previous one.
    pub fn edit_participant(
        &self,
        storage: &mut dyn Storage,
        address: &Addr,
        stake: Uint128,
    ) -> Result<Uint128, ContractError> {
        let mut state = self.load_registering(storage)?;
        let mut participant = self
            .participants
            .may_load(storage, address)?
            .ok_or_else(|| ContractError::NotFound(address.to_string()))?;
        if stake.is_zero() {
            return Err(ContractError::InvalidShare(address.to_string()));
        }

        state.total_shares = state
            .total_shares
            .checked_sub(participant.stake)?
            .checked_add(stake)?;
        if state.total_shares > state.pool_stake {
            return Err(ContractError::ExceedsPoolStake {});
        }

        let old_stake = participant.stake;
        participant.stake = stake;
        self.participants.save(storage, address, &participant)?;
        self.state.save(storage, &state)?;
        Ok(old_stake)
    }

    /// Removes a participant and returns its stake.
    pub fn remove_participant(
        &self,
        storage: &mut dyn Storage,
        address: &Addr,
    ) -> Result<Uint128, ContractError> {
        let mut state = self.load_registering(storage)?;
        let participant = self
            .participants
            .may_load(storage, address)?
            .ok_or_else(|| ContractError::NotFound(address.to_string()))?;

        let last_slot = state.participant_count - 1;
        if participant.slot != last_slot {
            let last_address = self.slots.load(storage, last_slot)?;
            self.slots.save(storage, participant.slot, &last_address)?;
            self.participants
                .update::<_, ContractError>(storage, &last_address, |moved| {
                    let mut moved =
                        moved.ok_or_else(|| ContractError::NotFound(last_address.to_string()))?;
                    moved.slot = participant.slot;
                    Ok(moved)
                })?;
        }
        self.slots.remove(storage, last_slot);
        self.participants.remove(storage, address);

        state.participant_count = last_slot;
        state.total_shares = state.total_shares.checked_sub(participant.stake)?;
        self.state.save(storage, &state)?;
        Ok(participant.stake)
    }

    /// Freezes the participant set. The unallocated part of the pool stake becomes the
    /// burn remainder.
    pub fn finalize(&self, storage: &mut dyn Storage) -> Result<LedgerState, ContractError> {
        let mut state = self.load_registering(storage)?;
        state.burn = ShareAccount {
            stake: state.pool_stake.checked_sub(state.total_shares)?,
            paid: Uint128::zero(),
        };
        state.finalized = true;
        self.state.save(storage, &state)?;
        Ok(state)
    }

    /// Number of accounts sharing the pool, the burn remainder included when non-zero.
    pub fn number_of_accounts(state: &LedgerState) -> u32 {
        if state.burn.stake.is_zero() {
            state.participant_count
        } else {
            state.participant_count + 1
        }
    }

    /// Raises the watermark by `amount` and returns the new watermark.
    pub fn record_release(
        &self,
        storage: &mut dyn Storage,
        amount: Uint128,
    ) -> Result<Uint128, ContractError> {
        let mut state = self.state.load(storage)?;
        if !state.finalized {
            return Err(ContractError::NotFinalized {});
        }
        state.total_released = state.total_released.checked_add(amount)?;
        if state.total_released > state.pool_stake {
            return Err(ContractError::ExceedsPoolStake {});
        }
        self.state.save(storage, &state)?;
        Ok(state.total_released)
    }

    /// Amount of released tokens a participant can withdraw now.
    pub fn available(&self, storage: &dyn Storage, address: &Addr) -> StdResult<Uint128> {
        let state = self.state.load(storage)?;
        let available = match self.participants.may_load(storage, address)? {
            Some(p) => entitlement(state.total_released, p.stake, state.pool_stake)
                .saturating_sub(p.paid),
            None => Uint128::zero(),
        };
        Ok(available)
    }

    /// Settles a participant: records and returns the part of its entitlement not paid
    /// yet.
    pub fn withdraw(
        &self,
        storage: &mut dyn Storage,
        address: &Addr,
    ) -> Result<Uint128, ContractError> {
        let state = self.load_finalized(storage)?;
        let mut participant = self
            .participants
            .may_load(storage, address)?
            .ok_or_else(|| ContractError::NotAParticipant(address.to_string()))?;

        let value = settle(&state, participant.stake, participant.paid)?;
        participant.paid = participant.paid.checked_add(value)?;
        self.participants.save(storage, address, &participant)?;
        Ok(value)
    }

    /// Settles the burn remainder the same way as a participant.
    pub fn burn(&self, storage: &mut dyn Storage) -> Result<Uint128, ContractError> {
        let mut state = self.load_finalized(storage)?;
        if state.burn.stake.is_zero() {
            return Err(ContractError::NotAParticipant("burn remainder".to_string()));
        }

        let value = settle(&state, state.burn.stake, state.burn.paid)?;
        state.burn.paid = state.burn.paid.checked_add(value)?;
        self.state.save(storage, &state)?;
        Ok(value)
    }

    fn load_finalized(&self, storage: &dyn Storage) -> Result<LedgerState, ContractError> {
        let state = self.state.load(storage)?;
        if !state.finalized {
            return Err(ContractError::NotFinalized {});
        }
        Ok(state)
    }

    /// Returns registered participants in ascending address order.
    ///
    /// * **start_after** address after which to start reading.
    ///
    /// * **limit** amount of participants to read.
    pub fn read_participants(
        &self,
        storage: &dyn Storage,
        start_after: Option<Addr>,
        limit: Option<u32>,
    ) -> StdResult<Vec<(Addr, Participant)>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
        let start = start_after.as_ref().map(Bound::exclusive);

        self.participants
            .range(storage, start, None, Order::Ascending)
            .take(limit)
            .collect()
    }
}

fn settle(state: &LedgerState, stake: Uint128, paid: Uint128) -> Result<Uint128, ContractError> {
    let value = entitlement(state.total_released, stake, state.pool_stake).checked_sub(paid)?;
    if value.is_zero() {
        return Err(ContractError::NoFundsAvailable {});
    }
    Ok(value)
}
