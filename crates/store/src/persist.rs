use std::{fs, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

/// Hydrates a persisted snapshot. A missing or unreadable file yields `None`
/// so a fresh or corrupted state directory starts from defaults.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub(crate) fn store_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
