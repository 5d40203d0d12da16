//! Authentication state.
//!
//! This module provides `SessionStore`, the single source of truth for who
//! is signed in. The user record and bearer token live in memory and in
//! durable storage, and are hydrated once at startup.

pub mod session;

pub use session::{SessionError, SessionSnapshot, SessionStore};
