pub mod logging;

// Encounter state: combatants, turn order, conditions, tracker
pub mod session;

// Key-value persistence shim and snapshot codec
pub mod storage;
