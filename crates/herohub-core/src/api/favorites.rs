use super::client::route;
use super::{ApiClient, ApiError, ApiRequest, Envelope};
use crate::models::{FavoriteStatus, Superhero};

impl ApiClient {
    pub async fn list_favorites(&self) -> Result<Envelope<Vec<Superhero>>, ApiError> {
        self.execute(ApiRequest::get(route("favorites"))).await
    }

    /// An already-favorited hero comes back as a logical error, not an HTTP one.
    pub async fn add_favorite(&self, hero_id: i64) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.execute(ApiRequest::post(route(&format!("favorites/{}", hero_id))))
            .await
    }

    pub async fn remove_favorite(&self, hero_id: i64) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.execute(ApiRequest::delete(route(&format!("favorites/{}", hero_id))))
            .await
    }

    pub async fn check_favorite(&self, hero_id: i64) -> Result<Envelope<FavoriteStatus>, ApiError> {
        self.execute(ApiRequest::get(route(&format!("favorites/check/{}", hero_id))))
            .await
    }
}
