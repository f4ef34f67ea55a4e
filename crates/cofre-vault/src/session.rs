//! Unlocked-session context.
//!
//! A [`Session`] is the only place the master password lives after login.
//! It is created by [`crate::auth::register`] or [`crate::auth::login`],
//! passed by reference into every entry operation, and destroyed by
//! [`Session::lock`] or by being dropped. The password is zeroized on drop.

use std::fmt;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};

/// Master password held for the lifetime of an unlocked session.
///
/// Debug implementation is masked to prevent secret leakage.
pub struct Session {
    master_password: SecretString,
    last_activity: Instant,
    idle_timeout: Duration,
}

impl Session {
    pub(crate) fn new(master_password: &str, idle_timeout: Duration) -> Self {
        Self {
            master_password: SecretString::from(master_password),
            last_activity: Instant::now(),
            idle_timeout,
        }
    }

    pub(crate) fn master_password(&self) -> &str {
        self.master_password.expose_secret()
    }

    /// Record user activity, restarting the idle timer.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Whether the session has been inactive for at least its idle timeout.
    ///
    /// The session does not lock itself; callers check this and call
    /// [`Session::lock`].
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.last_activity.elapsed() >= self.idle_timeout
    }

    /// Configured idle timeout.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// End the session, zeroizing the master password.
    pub fn lock(self) {
        drop(self);
        tracing::info!("session locked");
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(***)")
    }
}
