use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use api_types::user::User;
use client::TokenStore;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{StoreError, persist};

const AUTH_STORAGE_FILE: &str = "auth-storage.json";

/// Authentication state. Two states exist: anonymous and authenticated;
/// there is no refreshing state, a rejected token forces a full re-login.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// Transient flag for in-flight auth work. Never persisted.
    pub loading: bool,
}

/// The subset of [`AuthState`] that survives a restart.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthSnapshot {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
}

impl AuthSnapshot {
    fn of(state: &AuthState) -> Self {
        Self {
            user: state.user.clone(),
            token: state.token.clone(),
            is_authenticated: state.is_authenticated,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthStore {
    path: PathBuf,
    tokens: TokenStore,
    inner: Arc<Mutex<AuthState>>,
}

impl AuthStore {
    /// Hydrates persisted auth state. The raw token file is what the HTTP
    /// client attaches to requests, so when the snapshot disagrees with it
    /// the token file wins and the identity is dropped until the next
    /// rehydration confirms it.
    pub fn open(state_dir: impl AsRef<Path>, tokens: TokenStore) -> Self {
        let path = state_dir.as_ref().join(AUTH_STORAGE_FILE);
        let snapshot: AuthSnapshot = persist::load_json(&path).unwrap_or_default();

        let token = tokens.get();
        let state = match (token, snapshot.token) {
            (Some(current), Some(stored)) if current == stored => AuthState {
                user: snapshot.user,
                token: Some(current),
                is_authenticated: snapshot.is_authenticated,
                loading: false,
            },
            (Some(current), _) => AuthState {
                user: None,
                token: Some(current),
                is_authenticated: false,
                loading: false,
            },
            (None, _) => AuthState::default(),
        };

        Self {
            path,
            tokens,
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.inner.lock().await.clone()
    }

    /// Sets user, token and the authenticated flag in one transition.
    pub async fn login(&self, user: User, token: String) -> Result<(), StoreError> {
        self.tokens.set(&token)?;
        self.update(|state| {
            state.user = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
            state.loading = false;
        })
        .await
    }

    /// Resets to the anonymous state and clears the persisted token.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.tokens.clear()?;
        self.update(|state| *state = AuthState::default()).await
    }

    /// Same transition as [`AuthStore::logout`], used when the backend
    /// rejects the current token rather than the user asking to leave.
    pub async fn clear_auth(&self) -> Result<(), StoreError> {
        self.logout().await
    }

    /// Partial update used while rehydrating a previously issued token.
    /// Clearing the token also drops the authenticated flag; a session
    /// without a token cannot stay authenticated.
    pub async fn set_token(&self, token: Option<String>) -> Result<(), StoreError> {
        match token.as_deref() {
            Some(raw) => self.tokens.set(raw)?,
            None => self.tokens.clear()?,
        }
        self.update(|state| {
            state.is_authenticated = state.is_authenticated && token.is_some();
            state.token = token;
        })
        .await
    }

    /// Partial update used when the backend confirms the identity behind a
    /// live token; a confirmed user with a token is authenticated.
    pub async fn set_user(&self, user: User) -> Result<(), StoreError> {
        self.update(|state| {
            state.is_authenticated = state.token.is_some();
            state.user = Some(user);
        })
        .await
    }

    pub async fn set_loading(&self, loading: bool) {
        self.inner.lock().await.loading = loading;
    }

    async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut AuthState),
    {
        let mut guard = self.inner.lock().await;
        f(&mut guard);
        persist::store_json(&self.path, &AuthSnapshot::of(&guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::user::Role;

    fn temp_dir() -> PathBuf {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_state")
            .join(uuid::Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn student() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@uni.example".to_string(),
            role: Role::Student,
            institution_id: Some(10),
        }
    }

    #[tokio::test]
    async fn login_then_logout_leaves_no_partial_state() {
        let dir = temp_dir();
        let store = AuthStore::open(&dir, TokenStore::open(&dir));

        store.login(student(), "t1".to_string()).await.unwrap();
        let state = store.state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("t1"));
        assert_eq!(state.user.as_ref().map(|u| u.id), Some(1));

        store.logout().await.unwrap();
        let state = store.state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.token, None);
    }

    #[tokio::test]
    async fn persisted_snapshot_survives_reopen() {
        let dir = temp_dir();
        let tokens = TokenStore::open(&dir);
        let store = AuthStore::open(&dir, tokens.clone());
        store.login(student(), "t1".to_string()).await.unwrap();

        let reopened = AuthStore::open(&dir, TokenStore::open(&dir));
        let state = reopened.state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("t1"));
        assert_eq!(state.user.as_ref().map(|u| u.email.clone()),
            Some("ada@uni.example".to_string()));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn loading_flag_is_not_persisted() {
        let dir = temp_dir();
        let store = AuthStore::open(&dir, TokenStore::open(&dir));
        store.login(student(), "t1".to_string()).await.unwrap();
        store.set_loading(true).await;

        let raw = std::fs::read_to_string(dir.join(AUTH_STORAGE_FILE)).unwrap();
        assert!(!raw.contains("loading"));
    }

    #[tokio::test]
    async fn snapshot_token_mismatch_drops_identity() {
        let dir = temp_dir();
        let tokens = TokenStore::open(&dir);
        let store = AuthStore::open(&dir, tokens.clone());
        store.login(student(), "t1".to_string()).await.unwrap();

        // Token rotated behind the snapshot's back.
        tokens.set("t2").unwrap();
        let reopened = AuthStore::open(&dir, tokens);
        let state = reopened.state().await;
        assert_eq!(state.token.as_deref(), Some("t2"));
        assert_eq!(state.user, None);
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn missing_token_file_resets_to_anonymous() {
        let dir = temp_dir();
        let tokens = TokenStore::open(&dir);
        let store = AuthStore::open(&dir, tokens.clone());
        store.login(student(), "t1".to_string()).await.unwrap();

        tokens.clear().unwrap();
        let reopened = AuthStore::open(&dir, tokens);
        let state = reopened.state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.token, None);
    }

    #[tokio::test]
    async fn set_token_none_drops_authenticated_flag() {
        let dir = temp_dir();
        let store = AuthStore::open(&dir, TokenStore::open(&dir));
        store.login(student(), "t1".to_string()).await.unwrap();

        store.set_token(None).await.unwrap();
        let state = store.state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
    }

    #[tokio::test]
    async fn set_user_with_live_token_authenticates() {
        let dir = temp_dir();
        let tokens = TokenStore::open(&dir);
        tokens.set("t1").unwrap();

        let store = AuthStore::open(&dir, tokens);
        assert!(!store.state().await.is_authenticated);

        store.set_user(student()).await.unwrap();
        let state = store.state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.user.as_ref().map(|u| u.id), Some(1));
    }
}
