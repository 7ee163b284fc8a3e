//! Drives the query/mutation layer end-to-end against the mock backend:
//! cache hits, invalidation edges, retry behavior and auth state updates.

use std::{path::PathBuf, time::Duration};

use api_types::{
    auth::{CompanySignup, LoginRequest, StudentSignup},
    coupon::RedeemRequest,
    reward::{RewardNew, RewardStatusUpdate},
    transaction::GiveCoins,
    user::Role,
};
use cache::{OpError, QueryClient, Route, RetryPolicy, ops};
use client::{ApiError, Http, TokenStore, services::Services};
use mock_server::AppState;
use store::AuthStore;

fn temp_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_state")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
    }
}

struct Session {
    state: AppState,
    qc: QueryClient,
    services: Services,
    auth_store: AuthStore,
}

/// Stands up a fresh backend and an anonymous client session against it.
async fn anonymous() -> Session {
    let state = AppState::seeded();
    let addr = mock_server::spawn(state.clone()).await.unwrap();
    let dir = temp_dir();
    let tokens = TokenStore::open(&dir);
    let http = Http::new(&format!("http://{addr}"), tokens.clone()).unwrap();
    Session {
        state,
        qc: QueryClient::with_policy(fast_policy()),
        services: Services::new(http),
        auth_store: AuthStore::open(&dir, tokens),
    }
}

async fn logged_in(email: &str, password: &str) -> Session {
    let session = anonymous().await;
    ops::auth::login(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        },
    )
    .await
    .unwrap();
    session
}

async fn student_session() -> Session {
    logged_in("ada@campus.example", "ada-pw").await
}

#[tokio::test]
async fn login_updates_auth_state_and_routes_by_role() {
    let session = anonymous().await;
    let route = ops::auth::login(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &LoginRequest {
            email: "ada@campus.example".to_string(),
            password: "ada-pw".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(route, Route::StudentDashboard);
    assert_eq!(route.path(), "/student/dashboard");

    let state = session.auth_store.state().await;
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("tok-student"));
    assert_eq!(state.user.map(|u| u.role), Some(Role::Student));
}

#[tokio::test]
async fn student_signup_logs_in_and_routes_to_the_student_dashboard() {
    let session = anonymous().await;
    let route = ops::auth::signup_student(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &StudentSignup {
            name: "Lin Student".to_string(),
            email: "lin@campus.example".to_string(),
            password: "lin-pw".to_string(),
            institution_id: 10,
        },
    )
    .await
    .unwrap();

    assert_eq!(route, Route::StudentDashboard);
    let state = session.auth_store.state().await;
    assert!(state.is_authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.role), Some(Role::Student));

    // The issued token is live: the student surface answers with the fresh
    // account's empty balance.
    let balance = ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap();
    assert_eq!(balance.coins, 0);
}

#[tokio::test]
async fn company_signup_routes_to_the_company_dashboard() {
    let session = anonymous().await;
    let route = ops::auth::signup_company(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &CompanySignup {
            name: "New Bakery".to_string(),
            email: "bakery@campus.example".to_string(),
            password: "bakery-pw".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(route, Route::CompanyDashboard);
    assert_eq!(
        session.auth_store.state().await.user.map(|u| u.role),
        Some(Role::Company)
    );

    // A fresh company starts with an empty catalog.
    assert!(
        ops::company::rewards(&session.qc, &session.services.company)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn signup_with_a_taken_email_surfaces_conflict_and_stays_anonymous() {
    let session = anonymous().await;
    let err = ops::auth::signup_student(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &StudentSignup {
            name: "Impostor".to_string(),
            email: "ada@campus.example".to_string(),
            password: "pw".to_string(),
            institution_id: 10,
        },
    )
    .await
    .unwrap_err();

    match err {
        OpError::Api(api) => {
            assert_eq!(api.status().map(|s| s.as_u16()), Some(409));
            assert_eq!(api.to_string(), "email_taken");
        }
        OpError::Store(err) => panic!("unexpected store error: {err}"),
    }
    assert!(!session.auth_store.state().await.is_authenticated);
}

#[tokio::test]
async fn failed_login_surfaces_message_and_stays_anonymous() {
    let session = anonymous().await;
    let err = ops::auth::login(
        &session.qc,
        &session.services.auth,
        &session.auth_store,
        &LoginRequest {
            email: "ada@campus.example".to_string(),
            password: "wrong".to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        OpError::Api(api) => assert_eq!(api.to_string(), "invalid email or password"),
        OpError::Store(err) => panic!("unexpected store error: {err}"),
    }
    assert!(!session.auth_store.state().await.is_authenticated);
}

#[tokio::test]
async fn cached_read_serves_without_a_second_request() {
    let session = student_session().await;

    let first = ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap();
    let second = ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap();

    assert_eq!(first.coins, 120);
    assert_eq!(second.coins, 120);
    assert_eq!(session.state.hits("/api/student/balance"), 1);
}

#[tokio::test]
async fn redeem_invalidates_balance_transactions_and_coupons() {
    let session = student_session().await;

    assert_eq!(
        ops::student::balance(&session.qc, &session.services.student)
            .await
            .unwrap()
            .coins,
        120
    );
    assert!(
        ops::student::transactions(&session.qc, &session.services.student)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        ops::student::coupons(&session.qc, &session.services.student)
            .await
            .unwrap()
            .is_empty()
    );

    let res = ops::student::redeem(
        &session.qc,
        &session.services.student,
        &RedeemRequest { reward_id: 101 },
    )
    .await
    .unwrap();
    assert_eq!(res.coupon.reward_id, 101);

    // All three reads refetch and observe the post-redeem world.
    assert_eq!(
        ops::student::balance(&session.qc, &session.services.student)
            .await
            .unwrap()
            .coins,
        70
    );
    assert_eq!(
        ops::student::transactions(&session.qc, &session.services.student)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        ops::student::coupons(&session.qc, &session.services.student)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(session.state.hits("/api/student/balance"), 2);
    assert_eq!(session.state.hits("/api/student/transactions"), 2);
    assert_eq!(session.state.hits("/api/student/coupons"), 2);
}

#[tokio::test]
async fn failed_redeem_invalidates_nothing() {
    let session = student_session().await;

    assert_eq!(
        ops::student::balance(&session.qc, &session.services.student)
            .await
            .unwrap()
            .coins,
        120
    );

    let err = ops::student::redeem(
        &session.qc,
        &session.services.student,
        &RedeemRequest { reward_id: 102 },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "insufficient_balance");

    // Balance is served from cache; the failed mutation touched nothing.
    assert_eq!(
        ops::student::balance(&session.qc, &session.services.student)
            .await
            .unwrap()
            .coins,
        120
    );
    assert_eq!(session.state.hits("/api/student/balance"), 1);
}

#[tokio::test]
async fn server_errors_retry_up_to_the_configured_maximum() {
    let session = student_session().await;
    session
        .state
        .fail("/api/student/balance", 2, 500, r#"{"error":"boom"}"#);

    let balance = ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap();
    assert_eq!(balance.coins, 120);
    // Two failures then the success.
    assert_eq!(session.state.hits("/api/student/balance"), 3);

    // A key that never recovers: initial try plus three retries, then error.
    session
        .state
        .fail("/api/student/statistics", 10, 500, r#"{"error":"boom"}"#);
    let err = ops::student::statistics(&session.qc, &session.services.student)
        .await
        .unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(session.state.hits("/api/student/statistics"), 4);
}

#[tokio::test]
async fn client_errors_are_never_retried() {
    let session = student_session().await;
    session
        .state
        .fail("/api/student/coupons", 1, 404, r#"{"error":"unknown"}"#);

    let err = ops::student::coupons(&session.qc, &session.services.student)
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(session.state.hits("/api/student/coupons"), 1);
}

#[tokio::test]
async fn mutations_are_never_retried() {
    let session = student_session().await;
    session
        .state
        .fail("/api/student/redeem", 1, 500, r#"{"error":"flaky"}"#);

    let err = ops::student::redeem(
        &session.qc,
        &session.services.student,
        &RedeemRequest { reward_id: 101 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Server { .. }));
    assert_eq!(session.state.hits("/api/student/redeem"), 1);
}

#[tokio::test]
async fn give_invalidates_professor_balance_transactions_statistics() {
    let session = logged_in("grace@campus.example", "grace-pw").await;

    assert_eq!(
        ops::professor::balance(&session.qc, &session.services.professor)
            .await
            .unwrap()
            .coins,
        500
    );
    assert_eq!(
        ops::professor::statistics(&session.qc, &session.services.professor)
            .await
            .unwrap()
            .give_count,
        0
    );

    ops::professor::give(
        &session.qc,
        &session.services.professor,
        &GiveCoins {
            student_id: 1,
            amount: 30,
            message: Some("great talk".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ops::professor::balance(&session.qc, &session.services.professor)
            .await
            .unwrap()
            .coins,
        470
    );
    let stats = ops::professor::statistics(&session.qc, &session.services.professor)
        .await
        .unwrap();
    assert_eq!(stats.total_given, 30);
    assert_eq!(stats.students_reached, 1);
    assert_eq!(
        ops::professor::transactions(&session.qc, &session.services.professor)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(session.state.hits("/api/professor/balance"), 2);
    assert_eq!(session.state.hits("/api/professor/statistics"), 2);
}

#[tokio::test]
async fn reward_mutations_invalidate_catalog_and_statistics() {
    let session = logged_in("cafe@campus.example", "cafe-pw").await;

    assert_eq!(
        ops::company::rewards(&session.qc, &session.services.company)
            .await
            .unwrap()
            .len(),
        3
    );
    let stats = ops::company::statistics(&session.qc, &session.services.company)
        .await
        .unwrap();
    assert_eq!(stats.reward_count, 3);
    assert_eq!(stats.active_reward_count, 2);

    let created = ops::company::create_reward(
        &session.qc,
        &session.services.company,
        &RewardNew {
            name: "Tote bag".to_string(),
            description: "Canvas tote".to_string(),
            cost: 80,
            category: "merch".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ops::company::rewards(&session.qc, &session.services.company)
            .await
            .unwrap()
            .len(),
        4
    );
    assert_eq!(
        ops::company::statistics(&session.qc, &session.services.company)
            .await
            .unwrap()
            .reward_count,
        4
    );

    ops::company::set_reward_status(
        &session.qc,
        &session.services.company,
        created.id,
        &RewardStatusUpdate { active: false },
    )
    .await
    .unwrap();
    assert_eq!(
        ops::company::statistics(&session.qc, &session.services.company)
            .await
            .unwrap()
            .active_reward_count,
        2
    );

    ops::company::delete_reward(&session.qc, &session.services.company, created.id)
        .await
        .unwrap();
    assert_eq!(
        ops::company::rewards(&session.qc, &session.services.company)
            .await
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn mark_read_invalidates_list_and_unread_count() {
    let session = student_session().await;
    let api = session.services.student.notifications();

    assert_eq!(
        ops::notifications::unread_count(&session.qc, &api)
            .await
            .unwrap()
            .count,
        1
    );
    assert_eq!(
        ops::notifications::list(&session.qc, &api).await.unwrap().len(),
        2
    );

    ops::notifications::mark_read(&session.qc, &api, 901)
        .await
        .unwrap();

    // The notifications prefix covers both keys, so both refetch.
    assert_eq!(
        ops::notifications::unread_count(&session.qc, &api)
            .await
            .unwrap()
            .count,
        0
    );
    assert_eq!(
        session.state.hits("/api/student/notifications/unread-count"),
        2
    );
    assert_eq!(session.state.hits("/api/student/notifications"), 2);
}

#[tokio::test]
async fn logout_clears_auth_and_cache() {
    let session = student_session().await;
    ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap();

    ops::auth::logout(&session.qc, &session.services.auth, &session.auth_store)
        .await
        .unwrap();

    let state = session.auth_store.state().await;
    assert!(!state.is_authenticated);
    assert_eq!(state.user, None);
    assert_eq!(state.token, None);

    // Next balance read is a real request again (and now unauthorized).
    let err = ops::student::balance(&session.qc, &session.services.student)
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(session.state.hits("/api/student/balance"), 2);
}

#[tokio::test]
async fn rehydrate_confirms_a_live_token() {
    let state = AppState::seeded();
    let addr = mock_server::spawn(state.clone()).await.unwrap();
    let seeded = state.token_for(Role::Student).unwrap();

    // The token file a previous session would have left behind.
    let dir = temp_dir();
    let tokens = TokenStore::open(&dir);
    tokens.set(&seeded).unwrap();

    let http = Http::new(&format!("http://{addr}"), tokens.clone()).unwrap();
    let services = Services::new(http);
    let auth_store = AuthStore::open(&dir, tokens);

    let user = ops::auth::rehydrate(&services.auth, &auth_store)
        .await
        .unwrap();
    assert_eq!(user.map(|u| u.id), Some(1));

    let auth_state = auth_store.state().await;
    assert!(auth_state.is_authenticated);
    assert_eq!(auth_state.token, Some(seeded));
    assert!(!auth_state.loading);
}

#[tokio::test]
async fn rehydrate_with_rejected_token_resets_to_anonymous() {
    let state = AppState::seeded();
    let addr = mock_server::spawn(state.clone()).await.unwrap();
    let dir = temp_dir();
    let tokens = TokenStore::open(&dir);
    tokens.set("stale-token").unwrap();

    let http = Http::new(&format!("http://{addr}"), tokens.clone()).unwrap();
    let services = Services::new(http);
    let auth_store = AuthStore::open(&dir, tokens.clone());

    let user = ops::auth::rehydrate(&services.auth, &auth_store)
        .await
        .unwrap();
    assert_eq!(user, None);

    let auth_state = auth_store.state().await;
    assert!(!auth_state.is_authenticated);
    assert_eq!(auth_state.token, None);
    assert_eq!(tokens.get(), None);
}
