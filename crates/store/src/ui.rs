use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{StoreError, persist};

const UI_STORAGE_FILE: &str = "ui-storage.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// An in-app notification toast. Ids are client-generated; the backend's
/// notification records live in the query cache, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiNotification {
    pub id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub sidebar_open: bool,
    pub theme: Theme,
    /// Live cache refreshed by polling; intentionally not durable.
    pub notifications: Vec<UiNotification>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: Theme::default(),
            notifications: Vec::new(),
        }
    }
}

/// The subset of [`UiState`] that survives a restart.
#[derive(Debug, Serialize, Deserialize)]
struct UiSnapshot {
    sidebar_open: bool,
    theme: Theme,
}

impl Default for UiSnapshot {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: Theme::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UiStore {
    path: PathBuf,
    inner: Arc<Mutex<UiState>>,
}

impl UiStore {
    pub fn open(state_dir: impl AsRef<Path>) -> Self {
        let path = state_dir.as_ref().join(UI_STORAGE_FILE);
        let snapshot: UiSnapshot = persist::load_json(&path).unwrap_or_default();
        let state = UiState {
            sidebar_open: snapshot.sidebar_open,
            theme: snapshot.theme,
            notifications: Vec::new(),
        };
        Self {
            path,
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn state(&self) -> UiState {
        self.inner.lock().await.clone()
    }

    /// Returns the new sidebar state.
    pub async fn toggle_sidebar(&self) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().await;
        guard.sidebar_open = !guard.sidebar_open;
        let open = guard.sidebar_open;
        self.save(&guard)?;
        Ok(open)
    }

    pub async fn set_sidebar(&self, open: bool) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        guard.sidebar_open = open;
        self.save(&guard)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        guard.theme = theme;
        self.save(&guard)
    }

    /// Appends an unread notification with a fresh client-generated id.
    /// Notifications are ephemeral, so no disk write happens here.
    pub async fn add_notification(&self, message: impl Into<String>) -> UiNotification {
        let notification = UiNotification {
            id: Uuid::new_v4(),
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        };
        let mut guard = self.inner.lock().await;
        guard.notifications.push(notification.clone());
        notification
    }

    /// Marks one notification read; returns false when the id is unknown.
    pub async fn mark_read(&self, id: Uuid) -> bool {
        let mut guard = self.inner.lock().await;
        match guard.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub async fn unread_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    fn save(&self, state: &UiState) -> Result<(), StoreError> {
        persist::store_json(
            &self.path,
            &UiSnapshot {
                sidebar_open: state.sidebar_open,
                theme: state.theme,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_state")
            .join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn sidebar_and_theme_survive_reopen() {
        let dir = temp_dir();
        let store = UiStore::open(&dir);
        assert!(store.state().await.sidebar_open);

        store.toggle_sidebar().await.unwrap();
        store.set_theme(Theme::Dark).await.unwrap();

        let reopened = UiStore::open(&dir);
        let state = reopened.state().await;
        assert!(!state.sidebar_open);
        assert_eq!(state.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn notifications_are_not_persisted() {
        let dir = temp_dir();
        let store = UiStore::open(&dir);
        store.add_notification("coupon issued").await;
        store.set_sidebar(false).await.unwrap();

        let raw = std::fs::read_to_string(dir.join(UI_STORAGE_FILE)).unwrap();
        assert!(!raw.contains("notifications"));

        let reopened = UiStore::open(&dir);
        assert!(reopened.state().await.notifications.is_empty());
    }

    #[tokio::test]
    async fn add_notification_starts_unread_with_unique_id() {
        let store = UiStore::open(temp_dir());
        let a = store.add_notification("first").await;
        let b = store.add_notification("second").await;

        assert!(!a.read);
        assert_ne!(a.id, b.id);
        assert_eq!(store.unread_count().await, 2);

        assert!(store.mark_read(a.id).await);
        assert_eq!(store.unread_count().await, 1);

        // Marking twice is a no-op.
        assert!(store.mark_read(a.id).await);
        assert_eq!(store.unread_count().await, 1);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_false() {
        let store = UiStore::open(temp_dir());
        assert!(!store.mark_read(Uuid::new_v4()).await);
    }
}
