//! REST client for the SuperHero Hub backend.
//!
//! All calls go through `ApiClient`, which sends them over a `Transport`
//! and runs the `Middleware` chain around each one. The standard chain
//! injects the bearer token from durable storage and signs the user out on
//! a 401 outside the auth screens.
//!
//! Every endpoint returns the backend's `Envelope`. An HTTP 200 can still
//! carry `status: "error"`, so callers check the envelope as well.

pub mod client;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod transport;

mod auth;
mod favorites;
mod superheroes;
mod teams;

pub use client::{ApiClient, API_PREFIX, DEFAULT_API_URL};
pub use envelope::{Envelope, ResponseStatus};
pub use error::ApiError;
pub use middleware::{BearerAuth, Middleware, RequestLog, SessionGuard};
pub use teams::{MAX_RECOMMENDATION_COUNT, MAX_STAT_VALUE};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};
