//! Data models for SuperHero Hub entities.
//!
//! This module contains the request and response payloads exchanged with
//! the backend:
//!
//! - `User`, `AuthTokens`: the authenticated identity and login payload
//! - `Superhero`, `SuperheroPage`, `SuperheroQuery`, `SuperheroUpdate`: the catalog
//! - `Team`, `TeamCreate`, `TeamUpdate`, `TeamComparison`: user teams
//! - `FavoriteStatus`, `PowerRecommendation`, `ResetTokenStatus`: small results

pub mod superhero;
pub mod team;
pub mod user;

pub use superhero::{
    FavoriteStatus, PowerStat, Superhero, SuperheroPage, SuperheroQuery, SuperheroUpdate,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use team::{
    AlignmentDistribution, PowerRecommendation, Team, TeamComparison, TeamCreate, TeamScore,
    TeamStats, TeamUpdate, Winner,
};
pub use user::{
    AuthTokens, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    ResetTokenStatus, Role, User, VerifyResetTokenRequest,
};

/// Lenient timestamp decoding for backend `isoformat()` strings.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DDTHH:MM:SS[.ffffff]`,
/// which is read as UTC. `null` and missing fields decode to `None`.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

}
