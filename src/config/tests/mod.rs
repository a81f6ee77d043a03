//! Config module tests
//!
//! - Settings store (paths, backups, load/save)
//! - Transactions (commit, rollback)
//! - Customization record round-trips through the engine
