use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    ApiFailure, AppState, auth, company, marketplace, notifications, professor, profile, student,
};

#[derive(Clone, Debug)]
pub(crate) struct CurrentUser(pub api_types::user::User);

/// Counts the hit, applies any configured delay, then serves a queued
/// injected failure if one is waiting. Runs before auth so failure injection
/// also covers public routes.
async fn intercept(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    state.record_hit(&path);

    if let Some(delay) = state.delay_for(&path) {
        tokio::time::sleep(delay).await;
    }

    if let Some(failure) = state.pop_failure(&path) {
        let status =
            StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(failure.body),
        )
            .into_response();
    }

    next.run(request).await
}

async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiFailure::unauthorized("missing_token"))?;

    let seed = state
        .user_by_token(token)
        .ok_or_else(|| ApiFailure::unauthorized("invalid_token"))?;

    // Each role-scoped resource group is reachable by its own role only.
    let path = request.uri().path();
    for role in ["student", "professor", "company"] {
        if path.starts_with(&format!("/api/{role}/")) && seed.user.role.as_str() != role {
            return Err(ApiFailure::forbidden("wrong_role"));
        }
    }

    request.extensions_mut().insert(CurrentUser(seed.user));
    Ok(next.run(request).await)
}

/// Echoes the `Authorization` header back, so client tests can assert what
/// was actually sent on the wire.
async fn echo_auth(request: Request) -> Json<serde_json::Value> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": authorization }))
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup/student", post(auth::signup_student))
        .route("/api/auth/signup/company", post(auth::signup_company))
        .route("/api/rewards", get(marketplace::rewards))
        .route("/api/rewards/{id}", get(marketplace::reward))
        .route("/api/institutions", get(marketplace::institutions))
        .route("/api/echo-auth", get(echo_auth));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/student/profile",
            get(profile::profile).put(profile::update_profile),
        )
        .route("/api/student/balance", get(student::balance))
        .route("/api/student/statistics", get(student::statistics))
        .route("/api/student/transactions", get(student::transactions))
        .route("/api/student/redeem", post(student::redeem))
        .route("/api/student/coupons", get(student::coupons))
        .route("/api/student/notifications", get(notifications::list))
        .route(
            "/api/student/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/student/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/student/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/professor/profile",
            get(profile::profile).put(profile::update_profile),
        )
        .route("/api/professor/balance", get(professor::balance))
        .route("/api/professor/statistics", get(professor::statistics))
        .route("/api/professor/transactions", get(professor::transactions))
        .route("/api/professor/give", post(professor::give))
        .route("/api/professor/notifications", get(notifications::list))
        .route(
            "/api/professor/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/professor/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/professor/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/company/profile",
            get(profile::profile).put(profile::update_profile),
        )
        .route("/api/company/statistics", get(company::statistics))
        .route(
            "/api/company/rewards",
            get(company::rewards).post(company::create_reward),
        )
        .route(
            "/api/company/rewards/{id}",
            axum::routing::patch(company::update_reward).delete(company::delete_reward),
        )
        .route(
            "/api/company/rewards/{id}/status",
            axum::routing::patch(company::set_reward_status),
        )
        .route(
            "/api/company/rewards/{id}/image",
            post(company::upload_reward_image),
        )
        .route("/api/company/validate-coupon", post(company::validate_coupon))
        .route("/api/company/notifications", get(notifications::list))
        .route(
            "/api/company/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/company/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/company/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), intercept))
        .with_state(state)
}

pub async fn run_with_listener(
    state: AppState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("mock backend listening on {}", addr);
    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: AppState,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("mock backend failed: {err}");
        }
    });

    Ok(addr)
}

/// Binds an ephemeral port and serves in the background. Returns the bound
/// address for the client under test.
pub async fn spawn(state: AppState) -> Result<SocketAddr, std::io::Error> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    spawn_with_listener(state, listener)
}
