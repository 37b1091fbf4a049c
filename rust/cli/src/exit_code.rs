//! Exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Usage, configuration and engine errors alike.
pub const ERROR: i32 = 2;
