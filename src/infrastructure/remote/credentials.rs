//! # Credentials
//!
//! Read-only access to the process-wide session credential.
//!
//! The identity collaborator writes the credential through
//! [`SessionCredentials::sign_in`] and [`SessionCredentials::sign_out`]. The
//! remote client and the workflow only read it through
//! [`CredentialProvider`].
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::infrastructure::remote::credentials::{
//!     AccessToken, CredentialProvider, SessionCredentials,
//! };
//!
//! let session = SessionCredentials::new();
//! assert!(!session.is_authenticated());
//!
//! session.sign_in(AccessToken::new("eyJhbGciOi..."));
//! assert!(session.is_authenticated());
//! assert_eq!(format!("{:?}", session.credential().unwrap()), "AccessToken(***)");
//! ```

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// An opaque bearer token.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Capability to read the current credential.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Returns the current credential, if any.
    fn credential(&self) -> Option<AccessToken>;

    /// Returns true if a credential is currently available.
    fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }
}

/// Process-wide credential slot shared by clones.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    slot: Arc<RwLock<Option<AccessToken>>>,
}

impl SessionCredentials {
    /// Creates an empty (signed out) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that is already signed in.
    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    /// Stores a credential, replacing any previous one.
    pub fn sign_in(&self, token: AccessToken) {
        *self.slot.write() = Some(token);
    }

    /// Clears the credential.
    pub fn sign_out(&self) {
        *self.slot.write() = None;
    }
}

impl CredentialProvider for SessionCredentials {
    fn credential(&self) -> Option<AccessToken> {
        self.slot.read().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let session = SessionCredentials::new();
        let reader = session.clone();

        session.sign_in(AccessToken::new("t1"));
        assert_eq!(reader.credential().unwrap().expose(), "t1");

        session.sign_out();
        assert!(!reader.is_authenticated());
    }

    #[test]
    fn with_token_is_signed_in() {
        let session = SessionCredentials::with_token(AccessToken::new("t2"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn debug_redacts_token() {
        let token = AccessToken::new("secret");
        assert!(!format!("{token:?}").contains("secret"));
    }
}
