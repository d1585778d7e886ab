//! Shared utilities.

pub mod date;
pub mod hash;
pub mod path;
pub mod plural;
