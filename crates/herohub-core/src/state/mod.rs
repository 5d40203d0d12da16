//! Client-side interaction state.
//!
//! These types hold what a screen shows between calls: the hero page and
//! its favorite flags, a team draft, a comparison pick. Every mutating call
//! goes through a `SubmitGate`, so one action never has two requests in
//! flight, and fetches that can be superseded go through a `RequestTracker`.

pub mod gate;
pub mod heroes;
pub mod teams;

pub use gate::{RequestTracker, StateError, SubmitGate, SubmitGuard, Ticket};
pub use heroes::{FavoriteDetail, FavoritesList, HeroBrowser};
pub use teams::{
    Recommendation, RecommendationKind, TeamBuilder, TeamComparer, TeamDraft, TeamList,
    POWER_MIN_VALUE, RECOMMENDATION_SIZE,
};
