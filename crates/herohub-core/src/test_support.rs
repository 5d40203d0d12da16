//! Shared fixtures for unit tests: a scripted transport, a storage backend
//! that fails on demand, and sample payloads.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Semaphore;
use url::Url;

use crate::api::{ApiError, ApiRequest, RawResponse, Transport};
use crate::models::{AuthTokens, Role, User};
use crate::storage::{MemoryStorage, Storage, StorageError};

/// Transport that replays queued responses and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    hold: Option<Semaphore>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests are recorded but do not complete until `release` is called.
    pub fn paused() -> Self {
        Self {
            hold: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    /// Let `n` held requests complete.
    pub fn release(&self, n: usize) {
        if let Some(ref hold) = self.hold {
            hold.add_permits(n);
        }
    }

    /// Yield until `n` requests have reached the transport.
    pub async fn wait_for_requests(&self, n: usize) {
        while self.request_count() < n {
            tokio::task::yield_now().await;
        }
    }

    pub fn push_json(&self, status: StatusCode, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn push_error(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, _base_url: &Url, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(ref hold) = self.hold {
            hold.acquire().await.unwrap().forget();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Connection("no scripted response".to_string())))
    }
}

/// Memory storage that fails reads or writes of one key.
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_get: Option<&'static str>,
    fail_set: Option<&'static str>,
}

impl FailingStorage {
    pub fn failing_set(key: &'static str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_get: None,
            fail_set: Some(key),
        }
    }

    pub fn failing_get(key: &'static str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_get: Some(key),
            fail_set: None,
        }
    }

    /// The backing store, bypassing the injected failures
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn injected(key: &str) -> StorageError {
        StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("injected failure for {}", key),
        ))
    }
}

impl Storage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_get == Some(key) {
            return Err(Self::injected(key));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_set == Some(key) {
            return Err(Self::injected(key));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

pub fn sample_user(id: i64) -> User {
    User {
        id,
        email: format!("user{}@example.com", id),
        username: None,
        first_name: "Ada".to_string(),
        last_name: "Byron".to_string(),
        role: Role::User,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_tokens(token: &str, user_id: i64) -> AuthTokens {
    AuthTokens {
        access_token: token.to_string(),
        token_type: "bearer".to_string(),
        expires_in: 2_592_000,
        user: sample_user(user_id),
    }
}

/// A user record as the backend sends it
pub fn user_json(id: i64) -> String {
    format!(
        r#"{{"id":{},"email":"user{}@example.com","username":null,"first_name":"Ada","last_name":"Byron","role":"user","is_active":true,"created_at":"2024-01-02T03:04:05","updated_at":null}}"#,
        id, id
    )
}

pub fn hero_json(id: i64, is_favorite: bool) -> String {
    format!(
        r#"{{"id":{},"name":"Hero {}","intelligence":50,"strength":40,"speed":30,"durability":20,"power":10,"combat":60,"alignment":"good","publisher":"Marvel Comics","is_favorite":{}}}"#,
        id, id, is_favorite
    )
}

pub fn team_json(id: i64, name: &str, hero_ids: &[i64]) -> String {
    let heroes: Vec<String> = hero_ids.iter().map(|h| hero_json(*h, false)).collect();
    format!(
        r#"{{"id":{},"name":"{}","description":null,"user_id":1,"created_at":"2024-01-02T03:04:05","updated_at":null,"superheroes":[{}]}}"#,
        id,
        name,
        heroes.join(",")
    )
}

/// A comparison payload where team 1 wins
pub fn comparison_json(team1: i64, team2: i64) -> String {
    format!(
        r#"{{"team1":{{"id":{a},"name":"Team {a}","stats":{{"total_power":500,"member_count":3}},"score":420.5}},"team2":{{"id":{b},"name":"Team {b}","stats":{{"total_power":400,"member_count":3}},"score":380.0}},"winner":{{"team_id":{a},"team_name":"Team {a}","score":420.5}},"explanation":"Team {a} has higher total power","reasons":["Higher total power"]}}"#,
        a = team1,
        b = team2
    )
}
