use std::net::SocketAddr;
use std::sync::Arc;

use common::store::memory::MemoryStore;
use reqwest::Client;
use serde_json::Value;

use server::config::{AppConfig, AuthConfig, CorsConfig, QuotaConfig, ServerConfig};
use server::state::AppState;

pub mod routes {
    pub const HEALTH: &str = "/api/v1/health";
    pub const UPLOAD: &str = "/api/v1/upload";
    pub const RECORDS: &str = "/api/v1/records";

    pub fn download(uid: &str) -> String {
        format!("/api/v1/download/{uid}")
    }
}

const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

pub struct TestResponse {
    pub status: u16,
    pub body: Value,
}

impl TestApp {
    /// Spawn the app on an ephemeral port with a generous default quota.
    pub async fn spawn() -> Self {
        Self::spawn_with_quota(10, 64).await
    }

    /// Spawn the app with the given default quota.
    pub async fn spawn_with_quota(max_amount: i64, max_upload_size_kb: i64) -> Self {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors: CorsConfig::default(),
            },
            auth: AuthConfig {
                jwt_secret: TEST_JWT_SECRET.into(),
            },
            quota: QuotaConfig {
                max_amount,
                max_upload_size_kb,
            },
        };

        let store = Arc::new(MemoryStore::new());
        server::seed::seed_default_quota(store.as_ref(), &config.quota)
            .await
            .expect("Failed to seed default quota");

        let state = AppState::new(store, Arc::new(config));
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server crashed");
        });

        Self {
            addr,
            client: Client::new(),
        }
    }

    /// Sign a token for `user_id` with the app's test secret.
    pub fn token_for(&self, user_id: &str) -> String {
        server::utils::jwt::sign(user_id, TEST_JWT_SECRET).expect("Failed to sign test token")
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Request failed");
        Self::into_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        Self::into_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Request failed");
        Self::into_response(res).await
    }

    /// Raw GET for endpoints that do not return JSON.
    pub async fn get_raw(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn into_response(res: reqwest::Response) -> TestResponse {
        let status = res.status().as_u16();
        let body = res.json().await.unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}
