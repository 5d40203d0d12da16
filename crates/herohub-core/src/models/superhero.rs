use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default page size used by the hero browser
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the backend accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// A catalog entry. Every attribute except `id` and `name` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Superhero {
    pub id: i64,
    pub name: String,

    pub intelligence: Option<i32>,
    pub strength: Option<i32>,
    pub speed: Option<i32>,
    pub durability: Option<i32>,
    pub power: Option<i32>,
    pub combat: Option<i32>,

    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub alter_egos: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub first_appearance: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub aliases: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub height_feet: Option<String>,
    #[serde(default)]
    pub height_cm: Option<String>,
    #[serde(default)]
    pub weight_lbs: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub group_affiliation: Option<String>,
    #[serde(default)]
    pub relatives: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,

    /// Only present when the listing was requested with a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl Superhero {
    /// Sum of the six power stats, missing stats counted as zero
    pub fn total_power(&self) -> i32 {
        PowerStat::ALL.iter().map(|stat| self.stat(*stat).unwrap_or(0)).sum()
    }

    pub fn stat(&self, stat: PowerStat) -> Option<i32> {
        match stat {
            PowerStat::Intelligence => self.intelligence,
            PowerStat::Strength => self.strength,
            PowerStat::Speed => self.speed,
            PowerStat::Durability => self.durability,
            PowerStat::Power => self.power,
            PowerStat::Combat => self.combat,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }

    pub fn alignment_display(&self) -> &str {
        self.alignment.as_deref().filter(|a| !a.is_empty()).unwrap_or("unknown")
    }
}

/// The six power stats every hero is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStat {
    Intelligence,
    Strength,
    Speed,
    Durability,
    Power,
    Combat,
}

impl PowerStat {
    pub const ALL: [PowerStat; 6] = [
        PowerStat::Intelligence,
        PowerStat::Strength,
        PowerStat::Speed,
        PowerStat::Durability,
        PowerStat::Power,
        PowerStat::Combat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerStat::Intelligence => "intelligence",
            PowerStat::Strength => "strength",
            PowerStat::Speed => "speed",
            PowerStat::Durability => "durability",
            PowerStat::Power => "power",
            PowerStat::Combat => "combat",
        }
    }
}

impl fmt::Display for PowerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PowerStat::ALL
            .iter()
            .copied()
            .find(|stat| stat.as_str() == lower)
            .ok_or_else(|| format!("unknown power stat: {}", s))
    }
}

/// One page of the catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SuperheroPage {
    #[serde(default)]
    pub items: Vec<Superhero>,
    #[serde(default)]
    pub total: i64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Listing filters for `GET /superheroes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperheroQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub alignment: Option<String>,
}

impl Default for SuperheroQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            alignment: None,
        }
    }
}

impl SuperheroQuery {
    /// Query-string pairs, with page bounds clamped to what the server accepts
    /// and blank filters dropped.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            (
                "page_size".to_string(),
                self.page_size.clamp(1, MAX_PAGE_SIZE).to_string(),
            ),
        ];
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(alignment) = self.alignment.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("alignment".to_string(), alignment.to_string()));
        }
        pairs
    }
}

/// Admin edit of a hero. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SuperheroUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combat: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alter_egos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_feet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relatives: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SuperheroUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set a field by its wire name, parsing stats as integers.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let text = Some(value.to_string());
        let stat = || {
            value
                .trim()
                .parse::<i32>()
                .map(Some)
                .map_err(|_| format!("{} must be a number, got '{}'", field, value))
        };
        match field {
            "name" => self.name = text,
            "intelligence" => self.intelligence = stat()?,
            "strength" => self.strength = stat()?,
            "speed" => self.speed = stat()?,
            "durability" => self.durability = stat()?,
            "power" => self.power = stat()?,
            "combat" => self.combat = stat()?,
            "full_name" => self.full_name = text,
            "alter_egos" => self.alter_egos = text,
            "place_of_birth" => self.place_of_birth = text,
            "first_appearance" => self.first_appearance = text,
            "publisher" => self.publisher = text,
            "alignment" => self.alignment = text,
            "aliases" => self.aliases = text,
            "gender" => self.gender = text,
            "race" => self.race = text,
            "height_feet" => self.height_feet = text,
            "height_cm" => self.height_cm = text,
            "weight_lbs" => self.weight_lbs = text,
            "weight_kg" => self.weight_kg = text,
            "eye_color" => self.eye_color = text,
            "hair_color" => self.hair_color = text,
            "occupation" => self.occupation = text,
            "base" => self.base = text,
            "group_affiliation" => self.group_affiliation = text,
            "relatives" => self.relatives = text,
            "image_url" => self.image_url = text,
            other => return Err(format!("unknown superhero field: {}", other)),
        }
        Ok(())
    }
}

/// Result of `GET /favorites/check/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}
