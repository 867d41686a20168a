//! CBS Simulator Common Types
//!
//! Shared types used across the core banking simulator: entity identifiers,
//! currency codes, timestamps and the error taxonomy surfaced to callers.

pub mod identifiers;
pub mod monetary;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use error::*;
pub use time::*;
