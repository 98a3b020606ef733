// Bearer session holder
//
// The single source of truth for the current access token. Every admin
// call reads it from here; sign-in installs it, sign-out and any 401/403
// response clear it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tracing::debug;

/// Lock-free holder for the admin bearer token.
#[derive(Default)]
pub struct Session {
    token: ArcSwapOption<SecretString>,
}

impl Session {
    /// Create an empty (signed-out) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that already holds `token`.
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// Install a new bearer token, replacing any previous one.
    pub fn set_token(&self, token: SecretString) {
        debug!("installing bearer token");
        self.token.store(Some(Arc::new(token)));
    }

    /// Drop the current token. Subsequent admin calls fail with `NotSignedIn`.
    pub fn clear(&self) {
        if self.token.swap(None).is_some() {
            debug!("bearer token cleared");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.load().is_some()
    }

    pub(crate) fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}
