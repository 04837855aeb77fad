use cw_controllers::Admin;
use cw_storage_plus::Item;
use distribution_base::ledger::ParticipantLedger;
use distribution_base::types::LedgerConfig;

pub const CONFIG: Item<LedgerConfig> = Item::new("config");

/// Address allowed to manage participants and burn the unallocated remainder
pub const OWNER: Admin = Admin::new("owner");

pub const LEDGER: ParticipantLedger =
    ParticipantLedger::new("participants", "participant_slots", "ledger_state");
