//! Exercises the client against the live mock backend on an ephemeral port.

use std::{path::PathBuf, time::Duration};

use api_types::{auth::LoginRequest, coupon::RedeemRequest, user::Role};
use client::{ApiError, FALLBACK_MESSAGE, Http, TokenStore, services::Services};
use mock_server::AppState;

fn temp_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_state")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

async fn backend() -> (String, AppState) {
    let state = AppState::seeded();
    let addr = mock_server::spawn(state.clone()).await.unwrap();
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn without_token_no_authorization_header_is_sent() {
    let (url, _state) = backend().await;
    let http = Http::new(&url, TokenStore::open(temp_dir())).unwrap();

    let echo: serde_json::Value = http.get("/api/echo-auth").await.unwrap();
    assert_eq!(echo["authorization"], serde_json::Value::Null);
}

#[tokio::test]
async fn with_token_a_matching_bearer_header_is_sent() {
    let (url, _state) = backend().await;
    let tokens = TokenStore::open(temp_dir());
    tokens.set("tok-student").unwrap();
    let http = Http::new(&url, tokens).unwrap();

    let echo: serde_json::Value = http.get("/api/echo-auth").await.unwrap();
    assert_eq!(echo["authorization"], serde_json::json!("Bearer tok-student"));
}

#[tokio::test]
async fn error_body_message_field_wins() {
    let (url, state) = backend().await;
    state.fail(
        "/api/institutions",
        1,
        400,
        r#"{"error":"bad_request","message":"explained for humans"}"#,
    );
    let http = Http::new(&url, TokenStore::open(temp_dir())).unwrap();

    let err = http
        .get::<Vec<api_types::institution::Institution>>("/api/institutions")
        .await
        .unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "explained for humans");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_body_without_message_falls_back_to_error_field() {
    let (url, state) = backend().await;
    state.fail(
        "/api/institutions",
        1,
        400,
        r#"{"error":"insufficient_balance"}"#,
    );
    let http = Http::new(&url, TokenStore::open(temp_dir())).unwrap();

    let err = http
        .get::<Vec<api_types::institution::Institution>>("/api/institutions")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "insufficient_balance");
}

#[tokio::test]
async fn unparseable_error_body_uses_the_fixed_fallback() {
    let (url, state) = backend().await;
    state.fail("/api/institutions", 1, 500, "<html>oops</html>");
    let http = Http::new(&url, TokenStore::open(temp_dir())).unwrap();

    let err = http
        .get::<Vec<api_types::institution::Institution>>("/api/institutions")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn slow_response_fails_with_timeout_not_network() {
    let (url, state) = backend().await;
    state.delay("/api/institutions", Duration::from_millis(500));
    let http = Http::with_timeout(
        &url,
        TokenStore::open(temp_dir()),
        Duration::from_millis(100),
    )
    .unwrap();

    let err = http
        .get::<Vec<api_types::institution::Institution>>("/api/institutions")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn invalid_base_url_is_rejected_at_construction() {
    let err = Http::new("not a url", TokenStore::open(temp_dir())).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
}

#[tokio::test]
async fn login_persists_token_then_logout_clears_it() {
    let (url, _state) = backend().await;
    let dir = temp_dir();
    let tokens = TokenStore::open(&dir);
    let services = Services::new(Http::new(&url, tokens.clone()).unwrap());

    let res = services
        .auth
        .login(&LoginRequest {
            email: "ada@campus.example".to_string(),
            password: "ada-pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(res.user.role, Role::Student);
    assert_eq!(tokens.get(), Some(res.token.clone()));

    let me = services.auth.me().await.unwrap();
    assert_eq!(me.id, res.user.id);

    services.auth.logout().unwrap();
    assert_eq!(tokens.get(), None);

    let err = services.auth.me().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

#[tokio::test]
async fn bad_credentials_surface_the_backend_message() {
    let (url, _state) = backend().await;
    let services = Services::new(Http::new(&url, TokenStore::open(temp_dir())).unwrap());

    let err = services
        .auth
        .login(&LoginRequest {
            email: "ada@campus.example".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid email or password");
    assert!(err.is_client_error());
}

#[tokio::test]
async fn redeem_beyond_balance_is_a_400_with_backend_error() {
    let (url, state) = backend().await;
    let tokens = TokenStore::open(temp_dir());
    tokens.set(&state.token_for(Role::Student).unwrap()).unwrap();
    let services = Services::new(Http::new(&url, tokens).unwrap());

    // Reward 102 costs 1000, the seeded student holds 120.
    let err = services
        .student
        .redeem(&RedeemRequest { reward_id: 102 })
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(err.to_string(), "insufficient_balance");
    assert_eq!(state.coins_of(1), Some(120));
}

#[tokio::test]
async fn redeem_issues_coupon_and_moves_coins() {
    let (url, state) = backend().await;
    let tokens = TokenStore::open(temp_dir());
    tokens.set(&state.token_for(Role::Student).unwrap()).unwrap();
    let services = Services::new(Http::new(&url, tokens).unwrap());

    let res = services
        .student
        .redeem(&RedeemRequest { reward_id: 101 })
        .await
        .unwrap();
    assert_eq!(res.coupon.reward_id, 101);
    assert!(!res.coupon.used);
    assert_eq!(state.coins_of(1), Some(70));

    let coupons = services.student.coupons().await.unwrap();
    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0].code, res.coupon.code);

    let transactions = services.student.transactions().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(
        transactions[0].kind,
        api_types::transaction::TransactionKind::Redeem
    );
}

#[tokio::test]
async fn wrong_role_cannot_read_another_resource_group() {
    let (url, state) = backend().await;
    let tokens = TokenStore::open(temp_dir());
    tokens.set(&state.token_for(Role::Student).unwrap()).unwrap();
    let services = Services::new(Http::new(&url, tokens).unwrap());

    let err = services.professor.balance().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn upload_attaches_image_with_bearer_auth() {
    let (url, state) = backend().await;
    let tokens = TokenStore::open(temp_dir());
    tokens.set(&state.token_for(Role::Company).unwrap()).unwrap();
    let services = Services::new(Http::new(&url, tokens).unwrap());

    let reward = services
        .company
        .upload_reward_image(101, "logo.png", b"png bytes".to_vec(), "image/png")
        .await
        .unwrap();
    assert_eq!(
        reward.image_url.as_deref(),
        Some("/uploads/rewards/101/logo.png")
    );
}
