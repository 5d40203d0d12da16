use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Superhero;

/// A user-owned team of heroes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: i64,
    #[serde(default, deserialize_with = "crate::models::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::models::timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub superheroes: Vec<Superhero>,
}

impl Team {
    pub fn member_ids(&self) -> Vec<i64> {
        self.superheroes.iter().map(|h| h.id).collect()
    }

    pub fn total_power(&self) -> i32 {
        self.superheroes.iter().map(Superhero::total_power).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub superhero_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superhero_ids: Option<Vec<i64>>,
}

/// Server-computed comparison of two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TeamComparison {
    pub team1: TeamScore,
    pub team2: TeamScore,
    pub winner: Winner,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl TeamComparison {
    /// A tie carries no winning team ID, only the label "Tie".
    pub fn is_tie(&self) -> bool {
        self.winner.team_id.is_none()
    }

    /// `None` when the server called it a tie
    pub fn winner_name(&self) -> Option<&str> {
        if self.is_tie() {
            return None;
        }
        self.winner.team_name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TeamScore {
    pub id: i64,
    pub name: String,
    pub stats: TeamStats,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(default)]
pub struct TeamStats {
    pub total_power: f64,
    pub average_power: f64,
    pub total_intelligence: f64,
    pub total_strength: f64,
    pub total_speed: f64,
    pub total_durability: f64,
    pub total_power_stat: f64,
    pub total_combat: f64,
    pub average_intelligence: f64,
    pub average_strength: f64,
    pub average_speed: f64,
    pub average_durability: f64,
    pub average_power_stat: f64,
    pub average_combat: f64,
    pub alignment_distribution: AlignmentDistribution,
    pub member_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(default)]
pub struct AlignmentDistribution {
    pub good: u32,
    pub bad: u32,
    pub neutral: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Winner {
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// Heroes recommended for high power, plus the stat the server picked.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerRecommendation {
    pub heroes: Vec<Superhero>,
    pub stat: Option<String>,
}

impl PowerRecommendation {
    /// Pull the stat name out of "Team recommended based on <stat>".
    pub fn stat_from_message(message: &str) -> Option<String> {
        let lower = message.to_ascii_lowercase();
        let start = lower.find("based on ")? + "based on ".len();
        let stat: String = message[start..]
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if stat.is_empty() {
            None
        } else {
            Some(stat)
        }
    }
}
