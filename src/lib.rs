/// Initiative Tracker - turn tracker for tabletop encounters (TUI Edition)
///
/// Core library providing initiative ordering, the turn/round pointer,
/// condition tracking and snapshot persistence, plus the terminal front end.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
