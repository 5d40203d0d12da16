use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::{RequestTracker, StateError, SubmitGate};
use crate::api::ApiClient;
use crate::models::{Superhero, Team, TeamComparison, TeamCreate, TeamUpdate};
use crate::validation::{validate_team, ValidationFailure, MAX_TEAM_SIZE};

/// How many heroes a recommendation asks for
pub const RECOMMENDATION_SIZE: u32 = 5;

/// Stat floor for power recommendations
pub const POWER_MIN_VALUE: u32 = 50;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    Balanced,
    Random,
    Power,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationKind::Balanced => write!(f, "balanced"),
            RecommendationKind::Random => write!(f, "random"),
            RecommendationKind::Power => write!(f, "power"),
        }
    }
}

impl FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "balanced" => Ok(RecommendationKind::Balanced),
            "random" => Ok(RecommendationKind::Random),
            "power" => Ok(RecommendationKind::Power),
            other => Err(format!("unknown recommendation kind: {}", other)),
        }
    }
}

/// A recommendation set plus the stat it was picked on, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    pub heroes: Vec<Superhero>,
    pub stat: Option<String>,
}

impl Recommendation {
    pub fn ids(&self) -> Vec<i64> {
        self.heroes.iter().map(|h| h.id).collect()
    }
}

/// A team being put together, before it is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDraft {
    pub name: String,
    pub description: String,
    /// Selected hero IDs in selection order
    pub selected: Vec<i64>,
}

impl TeamDraft {
    pub fn to_create(&self) -> TeamCreate {
        let description = self.description.trim();
        TeamCreate {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            superhero_ids: self.selected.clone(),
        }
    }
}

/// Team creation: a draft, the 5-member cap, and one gated create call.
pub struct TeamBuilder {
    draft: Mutex<TeamDraft>,
    recommendation: Mutex<Option<Recommendation>>,
    create_gate: SubmitGate,
    recommend_gate: SubmitGate,
}

impl Default for TeamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamBuilder {
    pub fn new() -> Self {
        Self {
            draft: Mutex::new(TeamDraft::default()),
            recommendation: Mutex::new(None),
            create_gate: SubmitGate::new("create-team"),
            recommend_gate: SubmitGate::new("recommend"),
        }
    }

    pub fn draft(&self) -> TeamDraft {
        lock(&self.draft).clone()
    }

    pub fn selected(&self) -> Vec<i64> {
        lock(&self.draft).selected.clone()
    }

    pub fn set_name(&self, name: &str) {
        lock(&self.draft).name = name.to_string();
    }

    pub fn set_description(&self, description: &str) {
        lock(&self.draft).description = description.to_string();
    }

    /// Start over with an empty draft and no recommendation.
    pub fn reset(&self) {
        *lock(&self.draft) = TeamDraft::default();
        *lock(&self.recommendation) = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.create_gate.is_submitting()
    }

    /// Select or deselect a hero. Returns whether it is now selected.
    ///
    /// Deselecting always works. Selecting past the cap is refused and the
    /// selection is left as it was.
    pub fn toggle_hero(&self, hero_id: i64) -> Result<bool, ValidationFailure> {
        let mut draft = lock(&self.draft);
        if let Some(pos) = draft.selected.iter().position(|id| *id == hero_id) {
            draft.selected.remove(pos);
            return Ok(false);
        }
        if draft.selected.len() >= MAX_TEAM_SIZE {
            return Err(ValidationFailure::TooManyHeroes {
                selected: draft.selected.len() + 1,
            });
        }
        draft.selected.push(hero_id);
        Ok(true)
    }

    /// Add heroes from a set until the team is full. Returns how many were added.
    pub fn select_all(&self, hero_ids: &[i64]) -> Result<usize, ValidationFailure> {
        let mut draft = lock(&self.draft);
        let free = MAX_TEAM_SIZE.saturating_sub(draft.selected.len());
        if free == 0 {
            return Err(ValidationFailure::TooManyHeroes {
                selected: draft.selected.len() + 1,
            });
        }

        let mut added = 0;
        for id in hero_ids {
            if added == free {
                break;
            }
            if !draft.selected.contains(id) {
                draft.selected.push(*id);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove every hero of a set from the selection.
    pub fn deselect_all(&self, hero_ids: &[i64]) {
        lock(&self.draft).selected.retain(|id| !hero_ids.contains(id));
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        lock(&self.recommendation).clone()
    }

    /// Ask the server for a suggested set and keep it next to the draft.
    pub async fn recommend(&self, client: &ApiClient, kind: RecommendationKind) -> Result<Recommendation, StateError> {
        let _guard = self.recommend_gate.try_begin()?;
        let recommendation = match kind {
            RecommendationKind::Balanced => Recommendation {
                heroes: client.recommend_balanced(RECOMMENDATION_SIZE).await?.into_data()?,
                stat: None,
            },
            RecommendationKind::Random => Recommendation {
                heroes: client.recommend_random(RECOMMENDATION_SIZE).await?.into_data()?,
                stat: None,
            },
            RecommendationKind::Power => {
                let power = client
                    .recommend_power(POWER_MIN_VALUE, RECOMMENDATION_SIZE)
                    .await?
                    .into_data()?;
                Recommendation {
                    heroes: power.heroes,
                    stat: power.stat,
                }
            }
        };
        debug!(%kind, count = recommendation.heroes.len(), "Recommendation received");
        *lock(&self.recommendation) = Some(recommendation.clone());
        Ok(recommendation)
    }

    /// Validate the draft locally, then create it. The draft is cleared on success.
    pub async fn create(&self, client: &ApiClient) -> Result<Team, StateError> {
        let request = self.draft().to_create();
        validate_team(&request.name, &request.superhero_ids)?;

        let _guard = self.create_gate.try_begin()?;
        let team = client.create_team(&request).await?.into_data()?;
        info!(team_id = team.id, members = team.superheroes.len(), "Team created");
        self.reset();
        Ok(team)
    }
}

/// The user's teams, with gated delete.
pub struct TeamList {
    teams: Mutex<Vec<Team>>,
    tracker: RequestTracker,
    update_gate: SubmitGate,
    delete_gate: SubmitGate,
}

impl Default for TeamList {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamList {
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(Vec::new()),
            tracker: RequestTracker::new(),
            update_gate: SubmitGate::new("update-team"),
            delete_gate: SubmitGate::new("delete-team"),
        }
    }

    pub async fn load(&self, client: &ApiClient) -> Result<Vec<Team>, StateError> {
        let ticket = self.tracker.begin();
        let teams = client.list_teams().await?.into_data()?;
        if !self.tracker.is_current(ticket) {
            return Err(StateError::Stale);
        }
        *lock(&self.teams) = teams.clone();
        Ok(teams)
    }

    pub fn close(&self) {
        self.tracker.close();
    }

    pub fn teams(&self) -> Vec<Team> {
        lock(&self.teams).clone()
    }

    pub fn team(&self, id: i64) -> Option<Team> {
        lock(&self.teams).iter().find(|t| t.id == id).cloned()
    }

    pub fn require(&self, id: i64) -> Result<Team, StateError> {
        self.team(id).ok_or(StateError::UnknownTeam(id))
    }

    /// Apply a partial update to a loaded team. Only the fields being
    /// changed are checked locally.
    pub async fn update(&self, client: &ApiClient, team_id: i64, update: &TeamUpdate) -> Result<Team, StateError> {
        self.require(team_id)?;
        update.validate_local()?;

        let _guard = self.update_gate.try_begin()?;
        let team = client.update_team(team_id, update).await?.into_data()?;
        if let Some(slot) = lock(&self.teams).iter_mut().find(|t| t.id == team_id) {
            *slot = team.clone();
        }
        info!(team_id, "Team updated");
        Ok(team)
    }

    pub async fn delete(&self, client: &ApiClient, team_id: i64) -> Result<(), StateError> {
        let _guard = self.delete_gate.try_begin()?;

        client.delete_team(team_id).await?.into_result()?;
        lock(&self.teams).retain(|t| t.id != team_id);
        info!(team_id, "Team deleted");
        Ok(())
    }
}

/// Two-team comparison: pick two distinct teams, then one gated compare.
pub struct TeamComparer {
    selection: Mutex<(Option<i64>, Option<i64>)>,
    result: Mutex<Option<TeamComparison>>,
    gate: SubmitGate,
}

impl Default for TeamComparer {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamComparer {
    pub fn new() -> Self {
        Self {
            selection: Mutex::new((None, None)),
            result: Mutex::new(None),
            gate: SubmitGate::new("compare-teams"),
        }
    }

    /// Pick a team: the first pick fills slot one, a different second pick
    /// fills slot two, anything after that is ignored.
    pub fn select(&self, team_id: i64) -> (Option<i64>, Option<i64>) {
        let mut selection = lock(&self.selection);
        match *selection {
            (None, _) => selection.0 = Some(team_id),
            (Some(first), None) if first != team_id => selection.1 = Some(team_id),
            _ => {}
        }
        *selection
    }

    /// Set both slots at once.
    pub fn select_pair(&self, first: i64, second: i64) -> Result<(), ValidationFailure> {
        if first == second {
            return Err(ValidationFailure::SameTeam);
        }
        *lock(&self.selection) = (Some(first), Some(second));
        Ok(())
    }

    pub fn selection(&self) -> (Option<i64>, Option<i64>) {
        *lock(&self.selection)
    }

    pub fn reset(&self) {
        *lock(&self.selection) = (None, None);
        *lock(&self.result) = None;
    }

    pub fn result(&self) -> Option<TeamComparison> {
        lock(&self.result).clone()
    }

    pub async fn compare(&self, client: &ApiClient) -> Result<TeamComparison, StateError> {
        let (first, second) = match self.selection() {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(ValidationFailure::IncompleteComparison.into()),
        };

        let _guard = self.gate.try_begin()?;
        let comparison = client.compare_teams(first, second).await?.into_data()?;
        debug!(first, second, winner = ?comparison.winner_name(), "Teams compared");
        *lock(&self.result) = Some(comparison.clone());
        Ok(comparison)
    }
}
