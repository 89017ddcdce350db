use std::fmt;
use std::sync::Arc;

use log::{info, warn};

use crate::error::ApiError;
use crate::storage::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Voter,
    Admin,
}

impl SessionKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKind::Voter => "accessToken",
            SessionKind::Admin => "adminAccessToken",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Voter => f.write_str("voter"),
            SessionKind::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { token: String },
}

/// One session of a given kind plus the store that persists its token.
///
/// Callers pass this around explicitly and read the token right before each
/// request. The token is written only by [`authenticate`](Self::authenticate)
/// and removed only by [`end`](Self::end), which [`guard`](Self::guard)
/// invokes on any `Unauthorized` result.
pub struct SessionContext {
    kind: SessionKind,
    session: Session,
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    /// Picks up a token persisted by an earlier run, if any.
    pub fn restore(kind: SessionKind, store: Arc<dyn TokenStore>) -> Self {
        let session = match store.load(kind) {
            Some(token) if !token.is_empty() => {
                info!("Restored {} session", kind);
                Session::Authenticated { token }
            }
            _ => Session::Anonymous,
        };
        Self {
            kind,
            session,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Authenticated { .. })
    }

    pub fn token(&self) -> Result<&str, ApiError> {
        match &self.session {
            Session::Authenticated { token } => Ok(token),
            Session::Anonymous => Err(ApiError::NotAuthenticated),
        }
    }

    pub fn authenticate(&mut self, token: String) {
        if let Err(e) = self.store.save(self.kind, &token) {
            warn!("Could not persist {} token: {:#}", self.kind, e);
        }
        self.session = Session::Authenticated { token };
        info!("{} session started", self.kind);
    }

    pub fn end(&mut self) {
        if let Err(e) = self.store.clear(self.kind) {
            warn!("Could not clear stored {} token: {:#}", self.kind, e);
        }
        if self.is_authenticated() {
            info!("{} session ended", self.kind);
        }
        self.session = Session::Anonymous;
    }

    /// Passes `result` through, ending the session first if the server
    /// rejected the token.
    pub fn guard<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::Unauthorized) = &result {
            warn!("Server rejected the {} token", self.kind);
            self.end();
        }
        result
    }
}
