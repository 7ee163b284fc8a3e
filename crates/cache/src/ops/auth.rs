use api_types::{
    auth::{CompanySignup, LoginRequest, StudentSignup},
    user::User,
};
use client::services::AuthService;
use reqwest::StatusCode;
use store::AuthStore;

use crate::{OpError, QueryClient, Route};

/// Logs in and records the session. First auth invalidates nothing (there is
/// no earlier per-user data to drop); the caller navigates to the returned
/// dashboard route.
pub async fn login(
    qc: &QueryClient,
    auth: &AuthService,
    auth_store: &AuthStore,
    req: &LoginRequest,
) -> Result<Route, OpError> {
    let res = qc.mutate(|| auth.login(req), &[]).await?;
    let role = res.user.role;
    auth_store.login(res.user, res.token).await?;
    Ok(Route::dashboard(role))
}

pub async fn signup_student(
    qc: &QueryClient,
    auth: &AuthService,
    auth_store: &AuthStore,
    req: &StudentSignup,
) -> Result<Route, OpError> {
    let res = qc.mutate(|| auth.signup_student(req), &[]).await?;
    let role = res.user.role;
    auth_store.login(res.user, res.token).await?;
    Ok(Route::dashboard(role))
}

pub async fn signup_company(
    qc: &QueryClient,
    auth: &AuthService,
    auth_store: &AuthStore,
    req: &CompanySignup,
) -> Result<Route, OpError> {
    let res = qc.mutate(|| auth.signup_company(req), &[]).await?;
    let role = res.user.role;
    auth_store.login(res.user, res.token).await?;
    Ok(Route::dashboard(role))
}

/// Clears the token, the auth state and the whole query cache; cached reads
/// are per-user data and must not leak into the next session.
pub async fn logout(
    qc: &QueryClient,
    auth: &AuthService,
    auth_store: &AuthStore,
) -> Result<(), OpError> {
    auth.logout()?;
    auth_store.logout().await?;
    qc.clear().await;
    Ok(())
}

/// Startup rehydration from a previously issued token.
///
/// Asks the backend who the token belongs to. Success refreshes the stored
/// identity through the partial-update transitions; a 401 means the token
/// was rejected and the only path back is a full re-login, so auth state is
/// reset to anonymous. Other failures (backend down, timeout) leave the
/// persisted state alone.
pub async fn rehydrate(auth: &AuthService, auth_store: &AuthStore) -> Result<Option<User>, OpError> {
    let Some(token) = auth.token() else {
        return Ok(None);
    };

    auth_store.set_loading(true).await;
    let result = auth.me().await;
    auth_store.set_loading(false).await;

    match result {
        Ok(user) => {
            auth_store.set_token(Some(token)).await?;
            auth_store.set_user(user.clone()).await?;
            Ok(Some(user))
        }
        Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {
            auth.logout()?;
            auth_store.clear_auth().await?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
