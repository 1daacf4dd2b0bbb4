use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use medlocator::config::{AdminRegistration, Config};

pub const PASSWORD: &str = "password123";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

/// A registered account and its bearer token.
pub struct Account {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn register(&self, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(body)
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register an account with `role` and log it in.
    pub async fn account(&self, role: &str, email: &str) -> Account {
        let (body, status) = self
            .register(&json!({
                "fullName": format!("{role} {email}"),
                "email": email,
                "password": PASSWORD,
                "role": role,
            }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {role} failed: {body}");
        self.login_account(email).await
    }

    pub async fn login_account(&self, email: &str) -> Account {
        let (body, status) = self.login(email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        Account {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// The bootstrap administrator.
    pub async fn admin(&self) -> Account {
        self.account("Admin", "admin@test.com").await
    }

    /// Register a pharmacist with a new pharmacy; returns the account and the pharmacy id.
    pub async fn pharmacist(&self, email: &str, pharmacy_name: &str) -> (Account, String) {
        let (body, status) = self
            .register(&json!({
                "fullName": "Pharmacist",
                "email": email,
                "password": PASSWORD,
                "role": "Pharmacist",
                "pharmacyDetails": {
                    "pharmacyName": pharmacy_name,
                    "pharmacyAddress": "Bole Road, Addis Ababa",
                    "contactNumber": "+251911000000",
                    "latitude": 9.0,
                    "longitude": 38.75,
                },
            }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register pharmacist failed: {body}");
        let pharmacy_id = body["pharmacy_id"].as_str().unwrap().to_string();
        (self.login_account(email).await, pharmacy_id)
    }

    /// Pharmacist whose pharmacy the admin has verified, so it can add medicines
    /// and appear in search.
    pub async fn verified_pharmacist(
        &self,
        admin: &Account,
        email: &str,
        pharmacy_name: &str,
    ) -> (Account, String) {
        let (pharmacist, pharmacy_id) = self.pharmacist(email, pharmacy_name).await;
        let (body, status) = self
            .put_auth(
                &format!("/api/admin/pharmacies/{pharmacy_id}/verify"),
                &admin.token,
                &json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify pharmacy failed: {body}");
        (pharmacist, pharmacy_id)
    }

    /// Add a medicine as `pharmacist`, return its id.
    pub async fn add_medicine(&self, pharmacist: &Account, name: &str) -> String {
        let (body, status) = self
            .post_auth(
                "/api/inventory/add-medicine",
                &pharmacist.token,
                &json!({ "name": name, "category": "Antibiotic" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add medicine failed: {body}");
        body["medicine_id"].as_str().unwrap().to_string()
    }

    pub async fn stock(
        &self,
        pharmacist: &Account,
        medicine_id: &str,
        quantity: i64,
        price: f64,
    ) -> (Value, StatusCode) {
        self.post_auth(
            "/api/inventory/update",
            &pharmacist.token,
            &json!({ "medicine_id": medicine_id, "quantity": quantity, "price": price }),
        )
        .await
    }

    /// Verified doctor able to issue prescriptions.
    pub async fn doctor(&self, admin: &Account, email: &str) -> Account {
        let doctor = self.account("Doctor", email).await;
        let (body, status) = self
            .put_auth(
                &format!("/api/admin/doctors/{}/verify", doctor.id),
                &admin.token,
                &json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify doctor failed: {body}");
        doctor
    }

    pub async fn set_user_status(&self, admin: &Account, user_id: &str, status: &str) -> (Value, StatusCode) {
        self.put_auth(
            &format!("/api/admin/users/{user_id}/status"),
            &admin.token,
            &json!({ "status": status }),
        )
        .await
    }

    pub async fn set_pharmacy_status(
        &self,
        admin: &Account,
        pharmacy_id: &str,
        status: &str,
    ) -> (Value, StatusCode) {
        self.put_auth(
            &format!("/api/admin/pharmacies/{pharmacy_id}/status"),
            &admin.token,
            &json!({ "status": status }),
        )
        .await
    }

    /// Current status column of a user, read straight from the database.
    pub async fn user_status(&self, user_id: &str) -> String {
        sqlx::query_scalar::<_, String>("SELECT status::text FROM users WHERE id = $1::uuid")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn pharmacy_status(&self, pharmacy_id: &str) -> String {
        sqlx::query_scalar::<_, String>("SELECT status::text FROM pharmacies WHERE id = $1::uuid")
            .bind(pharmacy_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

fn database_url_for(base_url: &str, db_name: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("medlocator_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_for(&base_url, "postgres"))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = database_url_for(&base_url, &db_name);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        token_ttl_minutes: 60,
        admin_registration: AdminRegistration::Bootstrap,
        max_body_size: 1_048_576,
        cors_origins: vec![],
        static_dir: None,
        db_max_connections: 5,
        log_level: "warn".to_string(),
    };

    let app = medlocator::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_for(&base_url, "postgres"))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
