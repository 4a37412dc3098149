#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use irl_games_api::auth::jwt::issue_access_token;
use irl_games_api::clock::{Clock, ManualClock};
use irl_games_api::config::{Config, Deployment};
use irl_games_api::entities::{category, game, user};
use irl_games_api::state::AppState;
use irl_games_api::store;
use irl_games_api::store::categories::CategoryDraft;
use irl_games_api::store::games::GameDraft;

/// Address every request appears to come from unless a test says otherwise.
pub const REMOTE: ([u8; 4], u16) = ([203, 0, 113, 7], 40_000);

pub fn remote() -> SocketAddr {
    SocketAddr::from(REMOTE)
}

/// Instant the manual clock starts at.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: std::net::Ipv4Addr::LOCALHOST.into(),
        server_port: 0,
        deployment: Deployment::Development,
        log_level: "debug".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_access_expiration_secs: 3600,
    }
}

/// A fresh migrated database behind the full router, with a frozen clock.
pub struct TestApp {
    pub state: AppState,
    pub clock: ManualClock,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = irl_games_api::db::connect_in_memory()
            .await
            .expect("in-memory database");
        let clock = ManualClock::new(epoch());
        let state = AppState {
            db,
            config: test_config(),
            clock: Arc::new(clock.clone()),
        };
        Self { state, clock }
    }

    pub fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.state.db
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn router_from(&self, addr: SocketAddr) -> Router {
        irl_games_api::routes::app(self.state.clone()).layer(MockConnectInfo(addr))
    }

    pub async fn user(&self, username: &str) -> user::Model {
        store::users::create(self.db(), username, "", "user", self.now())
            .await
            .expect("create user")
    }

    pub async fn admin(&self) -> user::Model {
        store::users::create(self.db(), "curator", "Curator", "admin", self.now())
            .await
            .expect("create admin")
    }

    pub fn token(&self, user: &user::Model) -> String {
        issue_access_token(user.id, &user.role, &self.state.config).expect("token")
    }

    pub async fn category(&self, title: &str) -> category::Model {
        let draft = CategoryDraft {
            title: title.to_string(),
            ..CategoryDraft::default()
        };
        store::categories::create(self.db(), draft, self.now())
            .await
            .expect("create category")
    }

    pub async fn game(&self, title: &str) -> game::Model {
        self.game_with(GameDraft {
            title: title.to_string(),
            ..GameDraft::default()
        })
        .await
    }

    pub async fn game_with(&self, draft: GameDraft) -> game::Model {
        store::games::create(self.db(), draft, self.now())
            .await
            .expect("create game")
    }

    /// Send a request from [`remote`] and decode the JSON answer (`Null` when not JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let raw = body.map(|b| b.to_string());
        self.send_raw_from(remote(), method, uri, token, raw).await
    }

    pub async fn send_raw_from(
        &self,
        addr: SocketAddr,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router_from(addr).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .unwrap_or_default();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}
