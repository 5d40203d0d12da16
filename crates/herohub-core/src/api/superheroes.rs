use super::client::route;
use super::{ApiClient, ApiError, ApiRequest, Envelope};
use crate::models::{Superhero, SuperheroPage, SuperheroQuery, SuperheroUpdate};

impl ApiClient {
    /// One page of the catalog. `is_favorite` is filled in when signed in.
    pub async fn list_superheroes(&self, query: &SuperheroQuery) -> Result<Envelope<SuperheroPage>, ApiError> {
        self.execute(ApiRequest::get(route("superheroes")).query_pairs(query.to_pairs()))
            .await
    }

    pub async fn get_superhero(&self, id: i64) -> Result<Envelope<Superhero>, ApiError> {
        self.execute(ApiRequest::get(route(&format!("superheroes/{}", id))))
            .await
    }

    /// Admin only. The backend answers 403 for other roles.
    pub async fn update_superhero(
        &self,
        id: i64,
        update: &SuperheroUpdate,
    ) -> Result<Envelope<Superhero>, ApiError> {
        self.execute(ApiRequest::put(route(&format!("superheroes/{}", id))).json(update)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};

    use super::*;
    use crate::api::DEFAULT_API_URL;
    use crate::test_support::{hero_json, MockTransport};

    #[tokio::test]
    async fn test_list_sends_filters() {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(DEFAULT_API_URL, transport.clone()).unwrap();
        transport.push_json(
            StatusCode::OK,
            &format!(
                r#"{{"status":"success","message":"Superheroes retrieved successfully","data":{{"items":[{}],"total":1,"page":2,"page_size":10,"pages":1}}}}"#,
                hero_json(7, false)
            ),
        );

        let query = SuperheroQuery {
            page: 2,
            page_size: 10,
            search: Some("bat".to_string()),
            alignment: Some(" ".to_string()),
        };
        let page = client.list_superheroes(&query).await.unwrap().into_data().unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 7);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.path, "/api/v1/superheroes");
        assert_eq!(
            sent.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "10".to_string()),
                ("search".to_string(), "bat".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(DEFAULT_API_URL, transport.clone()).unwrap();
        transport.push_json(
            StatusCode::OK,
            &format!(
                r#"{{"status":"success","message":"Superhero updated successfully","data":{}}}"#,
                hero_json(7, false)
            ),
        );

        let update = SuperheroUpdate {
            strength: Some(30),
            ..Default::default()
        };
        client.update_superhero(7, &update).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.path, "/api/v1/superheroes/7");
        assert_eq!(sent.body, Some(serde_json::json!({"strength": 30})));
    }

    #[tokio::test]
    async fn test_get_missing_hero() {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(DEFAULT_API_URL, transport.clone()).unwrap();
        transport.push_json(StatusCode::NOT_FOUND, r#"{"detail":"Superhero not found"}"#);

        let result = client.get_superhero(999).await;
        assert!(matches!(result, Err(ApiError::NotFound(ref m)) if m == "Superhero not found"));
    }
}
