use bookly_api::config::Config;
use bookly_auth::JwtClaims;
use bookly_core::UserId;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod, in-memory stores), bind to an
        // ephemeral port.
        let app = bookly_api::app::build_app(Config::in_memory(JWT_SECRET))
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api/v1", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Mint a token directly, bypassing login. Used to exercise expiry handling.
fn mint_jwt(sub: UserId, lifetime: ChronoDuration, refresh: bool) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub,
        email: "minted@x.com".to_string(),
        jti: Uuid::new_v4(),
        refresh,
        issued_at: now - ChronoDuration::seconds(10),
        expires_at: now + lifetime,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn signup_body(email: &str, username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "correct horse",
        "first_name": "Ada",
        "last_name": "Lovelace",
    })
}

fn book_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "author": "Abelson & Sussman",
        "publisher": "MIT Press",
        "published_date": "1996-07-25",
        "page_count": 657,
        "language": "en",
    })
}

/// Sign up and log in, returning (access_token, refresh_token, user uid).
async fn login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    username: &str,
) -> (String, String, String) {
    let res = client
        .post(format!("{}/auth/signup", base_url))
        .json(&signup_body(email, username))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": email, "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
        body["user"]["uid"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let health_url = srv.base_url.replace("/api/v1", "/health");

    let res = reqwest::get(health_url).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/books", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_signup_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&signup_body("a@x.com", "ada"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert!(created.get("password_hash").is_none());
    assert_eq!(created["email"].as_str().unwrap(), "a@x.com");

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&signup_body("a@x.com", "grace"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "conflict");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    login(&client, &srv.base_url, "a@x.com", "ada").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": "wrong password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "nobody@x.com", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn book_lifecycle_create_get_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _, uid) = login(&client, &srv.base_url, "a@x.com", "ada").await;

    // Create: owner is the authenticated user.
    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .json(&book_body("SICP"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["owner_uid"].as_str().unwrap(), uid);
    let book_id = created["uid"].as_str().unwrap().to_string();

    // Get
    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["title"].as_str().unwrap(), "SICP");

    // List contains it
    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert!(
        listed["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b["uid"] == book_id.as_str())
    );

    // Partial update
    let res = client
        .patch(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .json(&json!({ "page_count": 700 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["page_count"].as_i64().unwrap(), 700);
    assert_eq!(updated["title"].as_str().unwrap(), "SICP");

    // Delete, then 404
    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_owner_cannot_mutate_a_book() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (owner_token, _, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;
    let (intruder_token, _, _) = login(&client, &srv.base_url, "b@x.com", "grace").await;

    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&book_body("SICP"))
        .send()
        .await
        .unwrap();
    let book_id = res.json::<serde_json::Value>().await.unwrap()["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let res = client
        .patch(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&intruder_token)
        .json(&json!({ "title": "stolen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Reading someone else's book is fine.
    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_and_malformed_book_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;

    let res = client
        .get(format!("{}/books/{}", srv.base_url, Uuid::new_v4()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/books/not-a-uuid", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let expired = mint_jwt(UserId::new(), ChronoDuration::seconds(-2), false);
    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(&expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_tokens_cannot_access_protected_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (_, refresh_token, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;

    let res = client
        .get(format!("{}/books", srv.base_url))
        .bearer_auth(&refresh_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_issues_a_working_access_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (access_token, refresh_token, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;

    // Access tokens are not accepted by the refresh endpoint.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .bearer_auth(&access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .bearer_auth(&refresh_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let fresh = body["access_token"].as_str().unwrap();

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(fresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;

    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = signup_body("a@x.com", "ada");
    body["password"] = json!("short");
    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (token, _, _) = login(&client, &srv.base_url, "b@x.com", "grace").await;
    let mut book = book_body("SICP");
    book["page_count"] = json!(0);
    let res = client
        .post(format!("{}/books", srv.base_url))
        .bearer_auth(&token)
        .json(&book)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_update_and_username_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token_a, _, _) = login(&client, &srv.base_url, "a@x.com", "ada").await;
    let (token_b, _, _) = login(&client, &srv.base_url, "b@x.com", "grace").await;

    let res = client
        .patch(format!("{}/users/me", srv.base_url))
        .bearer_auth(&token_a)
        .json(&json!({ "first_name": "Augusta" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["first_name"].as_str().unwrap(), "Augusta");
    assert_eq!(body["username"].as_str().unwrap(), "ada");

    // Taking another user's username conflicts.
    let res = client
        .patch(format!("{}/users/me", srv.base_url))
        .bearer_auth(&token_b)
        .json(&json!({ "username": "ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
