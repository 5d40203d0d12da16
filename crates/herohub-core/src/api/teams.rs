use super::client::route;
use super::{ApiClient, ApiError, ApiRequest, Envelope};
use crate::models::{PowerRecommendation, Superhero, Team, TeamComparison, TeamCreate, TeamUpdate};

/// Upper bound the backend puts on recommendation `count`
pub const MAX_RECOMMENDATION_COUNT: u32 = 10;

/// Upper bound the backend puts on `min_value` for power recommendations
pub const MAX_STAT_VALUE: u32 = 100;

impl ApiClient {
    pub async fn list_teams(&self) -> Result<Envelope<Vec<Team>>, ApiError> {
        self.execute(ApiRequest::get(route("teams"))).await
    }

    pub async fn get_team(&self, id: i64) -> Result<Envelope<Team>, ApiError> {
        self.execute(ApiRequest::get(route(&format!("teams/{}", id))))
            .await
    }

    /// Sends the draft as is. Size rules are checked by `TeamBuilder` first.
    pub async fn create_team(&self, team: &TeamCreate) -> Result<Envelope<Team>, ApiError> {
        self.execute(ApiRequest::post(route("teams")).json(team)?)
            .await
    }

    pub async fn update_team(&self, id: i64, update: &TeamUpdate) -> Result<Envelope<Team>, ApiError> {
        self.execute(ApiRequest::put(route(&format!("teams/{}", id))).json(update)?)
            .await
    }

    pub async fn delete_team(&self, id: i64) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.execute(ApiRequest::delete(route(&format!("teams/{}", id))))
            .await
    }

    pub async fn recommend_balanced(&self, count: u32) -> Result<Envelope<Vec<Superhero>>, ApiError> {
        self.recommend("balanced", count).await
    }

    pub async fn recommend_random(&self, count: u32) -> Result<Envelope<Vec<Superhero>>, ApiError> {
        self.recommend("random", count).await
    }

    /// Heroes strong in one stat the server picks. The stat is only named in
    /// the envelope message, so it is parsed out into `PowerRecommendation`.
    pub async fn recommend_power(
        &self,
        min_value: u32,
        count: u32,
    ) -> Result<Envelope<PowerRecommendation>, ApiError> {
        let request = ApiRequest::get(route("teams/recommendations/power"))
            .query("min_value", min_value.min(MAX_STAT_VALUE))
            .query("count", count.clamp(1, MAX_RECOMMENDATION_COUNT));
        let envelope: Envelope<Vec<Superhero>> = self.execute(request).await?;
        let stat = PowerRecommendation::stat_from_message(&envelope.message);
        Ok(envelope.map(|heroes| PowerRecommendation { heroes, stat }))
    }

    pub async fn compare_teams(&self, team1_id: i64, team2_id: i64) -> Result<Envelope<TeamComparison>, ApiError> {
        let request = ApiRequest::get(route("teams/compare"))
            .query("team1_id", team1_id)
            .query("team2_id", team2_id);
        self.execute(request).await
    }

    async fn recommend(&self, kind: &str, count: u32) -> Result<Envelope<Vec<Superhero>>, ApiError> {
        let request = ApiRequest::get(route(&format!("teams/recommendations/{}", kind)))
            .query("count", count.clamp(1, MAX_RECOMMENDATION_COUNT));
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};

    use super::*;
    use crate::api::DEFAULT_API_URL;
    use crate::test_support::{hero_json, team_json, MockTransport};

    fn client() -> (ApiClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(DEFAULT_API_URL, transport.clone()).unwrap();
        (client, transport)
    }

    #[tokio::test]
    async fn test_create_team_body() {
        let (client, transport) = client();
        transport.push_json(
            StatusCode::OK,
            &format!(
                r#"{{"status":"success","message":"Team created successfully","data":{}}}"#,
                team_json(4, "Night Shift", &[1, 2])
            ),
        );

        let draft = TeamCreate {
            name: "Night Shift".to_string(),
            description: None,
            superhero_ids: vec![1, 2],
        };
        let team = client.create_team(&draft).await.unwrap().into_data().unwrap();
        assert_eq!(team.id, 4);
        assert_eq!(team.member_ids(), vec![1, 2]);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path, "/api/v1/teams");
        assert_eq!(
            sent.body,
            Some(serde_json::json!({"name": "Night Shift", "superhero_ids": [1, 2]}))
        );
    }

    #[tokio::test]
    async fn test_recommendation_bounds_are_clamped() {
        let (client, transport) = client();
        transport.push_json(StatusCode::OK, r#"{"status":"success","message":"Random team recommended","data":[]}"#);
        client.recommend_random(50).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().query,
            vec![("count".to_string(), "10".to_string())]
        );

        transport.push_json(StatusCode::OK, r#"{"status":"success","message":"Balanced team recommended","data":[]}"#);
        client.recommend_balanced(0).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.path, "/api/v1/teams/recommendations/balanced");
        assert_eq!(sent.query, vec![("count".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_power_recommendation_names_stat() {
        let (client, transport) = client();
        transport.push_json(
            StatusCode::OK,
            &format!(
                r#"{{"status":"success","message":"Team recommended based on speed","data":[{}]}}"#,
                hero_json(9, false)
            ),
        );

        let rec = client.recommend_power(150, 3).await.unwrap().into_data().unwrap();
        assert_eq!(rec.stat.as_deref(), Some("speed"));
        assert_eq!(rec.heroes.len(), 1);
        assert_eq!(
            transport.last_request().unwrap().query,
            vec![
                ("min_value".to_string(), "100".to_string()),
                ("count".to_string(), "3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_compare_query() {
        let (client, transport) = client();
        transport.push_json(StatusCode::NOT_FOUND, r#"{"detail":"One or both teams not found"}"#);

        let result = client.compare_teams(1, 2).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.path, "/api/v1/teams/compare");
        assert_eq!(
            sent.query,
            vec![
                ("team1_id".to_string(), "1".to_string()),
                ("team2_id".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_team_without_data() {
        let (client, transport) = client();
        transport.push_json(StatusCode::OK, r#"{"status":"success","message":"Team deleted successfully"}"#);

        let envelope = client.delete_team(4).await.unwrap();
        assert!(envelope.is_success());
        assert_eq!(transport.last_request().unwrap().method, Method::DELETE);
    }
}
