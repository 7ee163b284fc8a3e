use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// File name the raw bearer token is persisted under, inside the state
/// directory.
const TOKEN_FILE: &str = "auth_token";

/// Persisted bearer token shared by the HTTP client and the auth state.
///
/// Both sides hold clones of the same handle, so the `Authorization` header
/// attached to requests always matches what auth state believes the token
/// is. The file holds the raw string, nothing else.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
    current: Arc<Mutex<Option<String>>>,
}

impl TokenStore {
    /// Opens the store, reading a previously persisted token if one exists.
    pub fn open(state_dir: impl AsRef<Path>) -> Self {
        let path = state_dir.as_ref().join(TOKEN_FILE);
        let current = fs::read_to_string(&path)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        Self {
            path,
            current: Arc::new(Mutex::new(current)),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn set(&self, token: &str) -> io::Result<()> {
        *self.lock() = Some(token.to_string());
        write_atomic(&self.path, token)
    }

    pub fn clear(&self) -> io::Result<()> {
        *self.lock() = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(|err| err.into_inner())
    }
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return fs::write(path, contents);
    };
    fs::create_dir_all(parent)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_state")
            .join(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn set_then_reopen_sees_token() {
        let dir = temp_dir();
        let store = TokenStore::open(&dir);
        assert_eq!(store.get(), None);

        store.set("t1").unwrap();
        assert_eq!(store.get().as_deref(), Some("t1"));

        let reopened = TokenStore::open(&dir);
        assert_eq!(reopened.get().as_deref(), Some("t1"));
    }

    #[test]
    fn clear_removes_file_and_memory() {
        let dir = temp_dir();
        let store = TokenStore::open(&dir);
        store.set("t1").unwrap();
        store.clear().unwrap();

        assert_eq!(store.get(), None);
        assert_eq!(TokenStore::open(&dir).get(), None);
    }

    #[test]
    fn clear_without_file_is_ok() {
        let dir = temp_dir();
        let store = TokenStore::open(&dir);
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }
}
