//! Utility modules.

pub mod clock;
