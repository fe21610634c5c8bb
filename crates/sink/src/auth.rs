//! Credential store and bearer-token authentication
//!
//! Authentication is a membership check against a static map from
//! shared secret to source identity, injected from configuration. The
//! 401/403 split matters to callers and is part of the contract:
//! missing or malformed headers are 401, a well-formed token that is
//! not registered is 403. No rate limiting, no rotation.

use std::collections::HashMap;

use axum::http::{HeaderMap, StatusCode, header};

use baton_protocol::SourceId;

/// Authentication failures, with their HTTP status mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header at all
    #[error("missing Authorization header")]
    MissingHeader,

    /// Header present but not `Bearer <token>`
    #[error("malformed Authorization header")]
    MalformedHeader,

    /// Well-formed token, but nobody we know
    #[error("unknown API token")]
    UnknownToken,
}

impl AuthError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingHeader | Self::MalformedHeader => StatusCode::UNAUTHORIZED,
            Self::UnknownToken => StatusCode::FORBIDDEN,
        }
    }
}

/// Static token -> source identity map
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    by_token: HashMap<String, SourceId>,
}

impl CredentialStore {
    /// Create an empty store (rejects everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from (source, token) pairs
    pub fn from_entries<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<SourceId>,
        T: Into<String>,
    {
        let by_token = entries
            .into_iter()
            .map(|(source, token)| (token.into(), source.into()))
            .collect();
        Self { by_token }
    }

    /// Register a credential
    pub fn insert(&mut self, source: impl Into<SourceId>, token: impl Into<String>) {
        self.by_token.insert(token.into(), source.into());
    }

    /// Number of registered credentials
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    /// Authenticate a request from its headers
    ///
    /// Returns the source identity the token is registered to.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<SourceId, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?;

        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::MalformedHeader);
        }

        self.by_token
            .get(token)
            .cloned()
            .ok_or(AuthError::UnknownToken)
    }
}
