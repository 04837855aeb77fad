use cosmwasm_std::Addr;
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};
use distribution_base::types::{Config, VestingState};

pub const CONFIG: Item<Config> = Item::new("config");

/// Address allowed to initialize the distribution and change its parameters
pub const OWNER: Admin = Admin::new("owner");

/// Beneficiary address of each pool, keyed by pool id
pub const POOL_ADDRESSES: Map<u8, Addr> = Map::new("pool_addresses");

/// Release state of each pool, keyed by pool id. Written at initialization.
pub const POOL_STATES: Map<u8, VestingState> = Map::new("pool_states");
