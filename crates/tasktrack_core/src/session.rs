//! Session gate and persisted UI preference.
//!
//! # Responsibility
//! - Track whether a user is identified (`anonymous | identified(name)`).
//! - Persist the identified username and the dark-mode flag.
//!
//! # Invariants
//! - anonymous -> identified only through a successful [`Session::login`].
//! - identified -> anonymous only through [`Session::logout`].
//! - [`Session::load`] reads persisted state and never writes it back.
//! - Usernames are display names, not credentials; they are never logged.

use crate::storage::{StorageAdapter, DARK_MODE_KEY, USER_KEY};
use log::info;

/// Current identity plus the dark-mode preference.
pub struct Session {
    user: Option<String>,
    dark_mode: bool,
    storage: StorageAdapter,
}

impl Session {
    /// Restores the previously persisted username and dark-mode flag.
    pub fn load(storage: StorageAdapter) -> Self {
        let user = storage
            .get::<Option<String>>(USER_KEY, None)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let dark_mode = storage.get(DARK_MODE_KEY, false);

        info!(
            "event=session_load module=session status=ok identified={} dark_mode={dark_mode}",
            user.is_some()
        );

        Self {
            user,
            dark_mode,
            storage,
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_identified(&self) -> bool {
        self.user.is_some()
    }

    /// Identifies `username` (trimmed) and persists it.
    ///
    /// Blank input is ignored and returns `false`.
    pub fn login(&mut self, username: &str) -> bool {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return false;
        }

        self.user = Some(trimmed.to_string());
        self.storage.set(USER_KEY, &self.user);
        info!("event=session_login module=session status=ok");
        true
    }

    /// Returns to the anonymous state and persists the cleared identity.
    pub fn logout(&mut self) {
        self.user = None;
        self.storage.set(USER_KEY, &self.user);
        info!("event=session_logout module=session status=ok");
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.storage.set(DARK_MODE_KEY, &enabled);
    }

    /// Flips the preference and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }
}
