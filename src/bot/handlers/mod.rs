//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for budget diary names
pub mod autocomplete;
