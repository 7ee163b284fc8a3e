use std::{collections::HashMap, future::Future, sync::Arc};

use client::ApiError;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{QueryKey, RetryPolicy};

#[derive(Default)]
struct EntryState {
    value: Option<serde_json::Value>,
    stale: bool,
}

/// One cache slot. The state lock also serializes refetches of this key:
/// within one key, last write wins; across keys no ordering is guaranteed.
#[derive(Default)]
struct Entry {
    state: Mutex<EntryState>,
}

/// Shared cache of reads, invalidated by writes.
///
/// Entries are read-many/write-by-invalidation: a successful mutation marks
/// affected keys stale and the next read refetches. There is no optimistic
/// local mutation of cached data.
pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, Arc<Entry>>>,
    retry: RetryPolicy,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(retry: RetryPolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retry,
        }
    }

    /// Returns the cached value for `key` when fresh, otherwise runs `fetch`
    /// under the retry policy and caches the result. A failed refetch keeps
    /// the stale entry and propagates the error.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let entry = self.entry(&key).await;
        let mut state = entry.state.lock().await;

        if !state.stale {
            if let Some(value) = &state.value {
                if let Ok(cached) = serde_json::from_value::<T>(value.clone()) {
                    return Ok(cached);
                }
            }
        }

        let fetched = self.fetch_with_retry(&key, fetch).await?;
        match serde_json::to_value(&fetched) {
            Ok(value) => {
                state.value = Some(value);
                state.stale = false;
            }
            Err(err) => {
                tracing::warn!("failed to cache {key}: {err}");
                state.value = None;
            }
        }
        Ok(fetched)
    }

    /// Runs a write exactly once (mutations never auto-retry) and, only on
    /// success, invalidates its declared edges. A failed mutation leaves
    /// every cache entry untouched.
    pub async fn mutate<T, F, Fut>(&self, run: F, invalidates: &[QueryKey]) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = run().await?;
        for key in invalidates {
            self.invalidate(key).await;
        }
        Ok(result)
    }

    /// Marks every entry under `prefix` stale. The data stays around until
    /// the next read replaces it.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        let matching: Vec<Arc<Entry>> = {
            let map = self.entries.lock().await;
            map.iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(_, entry)| Arc::clone(entry))
                .collect()
        };
        for entry in matching {
            entry.state.lock().await.stale = true;
        }
    }

    /// Drops every entry. Used on logout so no cached private data survives
    /// into the next session.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    async fn entry(&self, key: &QueryKey) -> Arc<Entry> {
        let mut map = self.entries.lock().await;
        Arc::clone(map.entry(key.clone()).or_default())
    }

    async fn fetch_with_retry<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(err) if self.retry.should_retry(attempt, &err) => {
                    tracing::warn!("query {key} failed on attempt {attempt}: {err}");
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
