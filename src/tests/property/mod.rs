//! Property-based tests for the Initiative Tracker
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `encounter_props`: initiative order and the turn pointer
//!   - Order is descending by initiative, ties keep insertion order
//!   - Advancing `len` times returns to the same combatant one round later
//!   - Advance and retreat undo each other
//!   - Toggling a condition twice is a no-op
//!   - Ending the encounter always resets everything
//!   - Removal keeps the turn pointer in bounds
//!
//! - `entry_props`: input validation and snapshot decoding
//!   - Any `i32` with surrounding whitespace parses
//!   - Blank names are always rejected
//!   - Decoding arbitrary text never panics
//!   - Encoded state decodes back to the same records
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable.

mod encounter_props;
mod entry_props;
