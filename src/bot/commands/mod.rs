//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Account commands - registration and activity history
pub mod account;

/// Budget diary management commands
pub mod diary;

/// General utility commands
pub mod general;

/// Investment planning commands
pub mod invest;

/// Split-expense commands
pub mod split;

// Export commands
pub use account::*;
pub use diary::*;
pub use general::*;
pub use invest::*;
pub use split::*;
