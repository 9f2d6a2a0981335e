use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::CredentialStore;
use auth::PersistenceError;
use auth::RefreshToken;
use auth::RefreshTokenRepository;
use auth::StoredCredentials;
use chirpy::chirp::errors::ChirpError;
use chirpy::chirp::models::Chirp;
use chirpy::chirp::models::ChirpId;
use chirpy::chirp::ports::ChirpRepository;
use chirpy::config::ServerConfig;
use chirpy::domain::chirp::service::ChirpService;
use chirpy::domain::user::service::UserService;
use chirpy::inbound::http::router::create_router;
use chirpy::user::errors::UserError;
use chirpy::user::models::User;
use chirpy::user::models::UserId;
use chirpy::user::ports::UserRepository;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUsers>,
    pub refresh_tokens: Arc<InMemoryRefreshTokens>,
}

impl TestApp {
    /// Spawn the application on the dev platform
    pub async fn spawn() -> Self {
        Self::spawn_on_platform("dev").await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_on_platform(platform: &str) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUsers::default());
        let chirps = Arc::new(InMemoryChirps::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokens::default());

        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, users.clone(), refresh_tokens.clone())
                .expect("Failed to create authenticator"),
        );

        let server = ServerConfig {
            http_port: port,
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
            platform: platform.to_string(),
        };

        let router = create_router(
            Arc::new(UserService::new(users.clone())),
            Arc::new(ChirpService::new(chirps)),
            authenticator,
            &server,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            refresh_tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user and return the response `data`
    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the response `data` (user, `token`, `refresh_token`)
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register and log in, returning the access token
    pub async fn access_token_for(&self, email: &str, password: &str) -> String {
        self.create_user(email, password).await;
        let data = self.login(email, password).await;
        data["token"].as_str().unwrap().to_string()
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    failing_lookups: AtomicBool,
}

impl InMemoryUsers {
    /// Make `find_by_id` fail while credential lookups keep working
    pub fn fail_lookups_by_id(&self) {
        self.failing_lookups.store(true, Ordering::SeqCst);
    }

    fn email_taken_by_other(users: &HashMap<Uuid, User>, user: &User) -> bool {
        users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if Self::email_taken_by_other(&users, &user) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        if self.failing_lookups.load(Ordering::SeqCst) {
            return Err(UserError::DatabaseError("connection reset".to_string()));
        }
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if Self::email_taken_by_other(&users, &user) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn delete_all(&self) -> Result<u64, UserError> {
        let mut users = self.users.lock().unwrap();
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }
}

#[async_trait]
impl CredentialStore for InMemoryUsers {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, PersistenceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .map(|u| StoredCredentials {
                user_id: u.id.0,
                password_hash: u.password_hash.clone(),
            }))
    }
}

#[derive(Default)]
pub struct InMemoryChirps {
    chirps: Mutex<Vec<Chirp>>,
}

#[async_trait]
impl ChirpRepository for InMemoryChirps {
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        self.chirps.lock().unwrap().push(chirp.clone());
        Ok(chirp)
    }

    async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps = self.chirps.lock().unwrap().clone();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        Ok(self
            .chirps
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *id)
            .cloned())
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        let mut chirps = self.chirps.lock().unwrap();
        let before = chirps.len();
        chirps.retain(|c| c.id != *id);
        if chirps.len() == before {
            return Err(ChirpError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, ChirpError> {
        let mut chirps = self.chirps.lock().unwrap();
        let removed = chirps.len() as u64;
        chirps.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokens {
    tokens: Mutex<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokens {
    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokens {
    async fn insert(&self, token: &RefreshToken) -> Result<(), PersistenceError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, PersistenceError> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, PersistenceError> {
        match self.tokens.lock().unwrap().get_mut(token) {
            Some(record) => {
                record.revoked_at.get_or_insert(revoked_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Throwaway database on the Postgres server named by `DATABASE_URL`
pub struct TestDb {
    pub pool: PgPool,
    db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create and migrate a fresh database, or `None` when `DATABASE_URL` is unset
    pub async fn from_env() -> Option<Self> {
        let Ok(server_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping Postgres test");
            return None;
        };

        let db_name = format!("test_chirpy_{}", Uuid::new_v4().simple());

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }

    /// Close the pool and drop the database
    pub async fn drop_database(self) {
        self.pool.close().await;

        if let Ok(mut conn) = PgConnection::connect(&self.server_url).await {
            let _ = conn
                .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.db_name).as_str())
                .await;
        }
    }
}
