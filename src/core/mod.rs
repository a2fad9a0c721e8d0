//! Core business logic - framework-agnostic diary sharing, split-expense ledger,
//! investment allocation, and activity logging.
//!
//! Every store-backed function takes the database handle explicitly; nothing here holds
//! global state.

/// Authorization - resolving access levels on budget diaries
pub mod access;
/// Append-only activity log
pub mod activity;
/// Budget diary ownership and membership
pub mod diary;
/// Investment allocation waterfall
pub mod invest;
/// Split-expense ledger and settlement
pub mod split;
/// User directory lookups
pub mod user;
