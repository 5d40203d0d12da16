//! Core library for the SuperHero Hub client.
//!
//! This crate owns everything below the presentation layer:
//!
//! - `api`: the gateway client, its middleware chain and the typed endpoints
//! - `auth`: the session store hydrated from durable storage
//! - `storage`: durable key-value backends (file, keychain, memory)
//! - `navigation`: the route state the 401 handler redirects through
//! - `models`: request/response types for the REST backend
//! - `validation` and `messages`: local form rules and user-facing errors
//! - `state`: interaction state (favorite toggles, team drafts, submit gating)

pub mod api;
pub mod auth;
pub mod config;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
