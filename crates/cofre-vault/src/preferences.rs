//! Non-sensitive vault preferences, stored as plain JSON beside the database.
//!
//! Readable before unlock so the registration and login rules apply from the
//! first screen. Cryptographic parameters are not preferences: they are
//! constants of `cofre-crypto-core`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const PREFERENCES_FILE: &str = "preferences.json";

/// Vault preferences.
///
/// Persisted to `{data_dir}/preferences.json`. All fields have defaults
/// via [`Default`], and missing fields in the file fall back individually.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Minimum master-password length in characters, checked at registration.
    #[serde(default = "default_min_master_password_length")]
    pub min_master_password_length: usize,

    /// Minutes of inactivity after which a session reports itself idle.
    #[serde(default = "default_auto_lock_timeout")]
    pub auto_lock_timeout_minutes: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_master_password_length: default_min_master_password_length(),
            auto_lock_timeout_minutes: default_auto_lock_timeout(),
        }
    }
}

const fn default_min_master_password_length() -> usize {
    6
}
const fn default_auto_lock_timeout() -> u32 {
    5
}

impl Preferences {
    /// Session idle timeout derived from `auto_lock_timeout_minutes`.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.auto_lock_timeout_minutes).saturating_mul(60))
    }

    /// Load preferences from `{data_dir}/preferences.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring corrupt preferences: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist preferences to `{data_dir}/preferences.json`.
    ///
    /// Writes to a `.tmp` file first, then renames over the target.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> std::io::Result<()> {
        let path = data_dir.join(PREFERENCES_FILE);
        let tmp = data_dir.join(".preferences.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;

        Ok(())
    }
}
