//! One module per command group. Each command enters its route, runs one
//! action through the core, and prints the result.

pub mod auth;
pub mod favorites;
pub mod heroes;
pub mod teams;
