use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::{RequestTracker, StateError, SubmitGate};
use crate::api::ApiClient;
use crate::models::{Superhero, SuperheroPage, SuperheroQuery};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Add or remove based on the current flag. Returns the new flag.
async fn flip_favorite(client: &ApiClient, hero_id: i64, currently: bool) -> Result<bool, StateError> {
    let envelope = if currently {
        client.remove_favorite(hero_id).await?
    } else {
        client.add_favorite(hero_id).await?
    };
    envelope.into_result()?;
    Ok(!currently)
}

/// The hero listing: one page at a time, with favorite toggles.
pub struct HeroBrowser {
    page: Mutex<Option<SuperheroPage>>,
    tracker: RequestTracker,
    favorite_gates: Mutex<HashMap<i64, SubmitGate>>,
}

impl Default for HeroBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeroBrowser {
    pub fn new() -> Self {
        Self {
            page: Mutex::new(None),
            tracker: RequestTracker::new(),
            favorite_gates: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a page. A result that was overtaken by a newer load, or that
    /// arrives after `close`, is dropped and reported as `Stale`.
    pub async fn load(&self, client: &ApiClient, query: &SuperheroQuery) -> Result<SuperheroPage, StateError> {
        let ticket = self.tracker.begin();
        let page = client.list_superheroes(query).await?.into_data()?;

        if !self.tracker.is_current(ticket) {
            debug!(page = query.page, "Discarding stale hero page");
            return Err(StateError::Stale);
        }
        *lock(&self.page) = Some(page.clone());
        Ok(page)
    }

    /// Stop applying results, e.g. when the view is left.
    pub fn close(&self) {
        self.tracker.close();
    }

    pub fn page(&self) -> Option<SuperheroPage> {
        lock(&self.page).clone()
    }

    pub fn heroes(&self) -> Vec<Superhero> {
        lock(&self.page)
            .as_ref()
            .map(|p| p.items.clone())
            .unwrap_or_default()
    }

    pub fn hero(&self, id: i64) -> Option<Superhero> {
        lock(&self.page)
            .as_ref()
            .and_then(|p| p.items.iter().find(|h| h.id == id).cloned())
    }

    fn gate_for(&self, id: i64) -> SubmitGate {
        lock(&self.favorite_gates)
            .entry(id)
            .or_insert_with(|| SubmitGate::new("toggle-favorite"))
            .clone()
    }

    pub fn is_toggling(&self, id: i64) -> bool {
        lock(&self.favorite_gates)
            .get(&id)
            .map(SubmitGate::is_submitting)
            .unwrap_or(false)
    }

    /// Flip a hero's favorite flag on the server and locally, without a refetch.
    ///
    /// On failure the local flag is left unchanged. If the browser was closed
    /// while the call was in flight, the page is not touched and `Stale` is
    /// returned.
    pub async fn toggle_favorite(&self, client: &ApiClient, hero_id: i64) -> Result<bool, StateError> {
        let currently = self
            .hero(hero_id)
            .ok_or(StateError::UnknownHero(hero_id))?
            .is_favorite();

        let gate = self.gate_for(hero_id);
        let _guard = gate.try_begin()?;
        let now = flip_favorite(client, hero_id, currently).await?;

        if self.tracker.is_closed() {
            debug!(hero_id, "Discarding favorite toggle for closed browser");
            return Err(StateError::Stale);
        }
        if let Some(page) = lock(&self.page).as_mut() {
            if let Some(hero) = page.items.iter_mut().find(|h| h.id == hero_id) {
                hero.is_favorite = Some(now);
            }
        }
        debug!(hero_id, is_favorite = now, "Favorite toggled");
        Ok(now)
    }
}

/// Favorite state for a single hero's detail view.
pub struct FavoriteDetail {
    hero_id: i64,
    is_favorite: Mutex<Option<bool>>,
    gate: SubmitGate,
}

impl FavoriteDetail {
    pub fn new(hero_id: i64) -> Self {
        Self {
            hero_id,
            is_favorite: Mutex::new(None),
            gate: SubmitGate::new("toggle-favorite"),
        }
    }

    pub fn hero_id(&self) -> i64 {
        self.hero_id
    }

    /// `None` until `load` has run
    pub fn is_favorite(&self) -> Option<bool> {
        *lock(&self.is_favorite)
    }

    pub async fn load(&self, client: &ApiClient) -> Result<bool, StateError> {
        let status = client.check_favorite(self.hero_id).await?.into_data()?;
        *lock(&self.is_favorite) = Some(status.is_favorite);
        Ok(status.is_favorite)
    }

    pub async fn toggle(&self, client: &ApiClient) -> Result<bool, StateError> {
        let _guard = self.gate.try_begin()?;
        let currently = match self.is_favorite() {
            Some(flag) => flag,
            None => client.check_favorite(self.hero_id).await?.into_data()?.is_favorite,
        };
        let now = flip_favorite(client, self.hero_id, currently).await?;
        *lock(&self.is_favorite) = Some(now);
        Ok(now)
    }
}

/// The user's favorites list. Removing drops the hero locally.
#[derive(Default)]
pub struct FavoritesList {
    heroes: Mutex<Vec<Superhero>>,
    tracker: RequestTracker,
    gate: Mutex<HashMap<i64, SubmitGate>>,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self, client: &ApiClient) -> Result<Vec<Superhero>, StateError> {
        let ticket = self.tracker.begin();
        let heroes = client.list_favorites().await?.into_data()?;
        if !self.tracker.is_current(ticket) {
            return Err(StateError::Stale);
        }
        *lock(&self.heroes) = heroes.clone();
        Ok(heroes)
    }

    pub fn close(&self) {
        self.tracker.close();
    }

    pub fn heroes(&self) -> Vec<Superhero> {
        lock(&self.heroes).clone()
    }

    pub async fn remove(&self, client: &ApiClient, hero_id: i64) -> Result<(), StateError> {
        if !lock(&self.heroes).iter().any(|h| h.id == hero_id) {
            return Err(StateError::UnknownHero(hero_id));
        }
        let gate = lock(&self.gate)
            .entry(hero_id)
            .or_insert_with(|| SubmitGate::new("remove-favorite"))
            .clone();
        let _guard = gate.try_begin()?;

        client.remove_favorite(hero_id).await?.into_result()?;
        if self.tracker.is_closed() {
            return Err(StateError::Stale);
        }
        lock(&self.heroes).retain(|h| h.id != hero_id);
        Ok(())
    }
}
