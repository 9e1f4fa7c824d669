//! Bearer credential model and the token provider boundary.
//!
//! The identity-provider sign-in flow lives outside this system; the core
//! only ever sees the short-lived bearer credential it produced. Expiry is
//! checked by timestamp comparison at call time, never by background
//! timers, and the core never refreshes a credential itself.

use chrono::{DateTime, Utc};

/// A short-lived bearer credential tied to an authenticated identity.
///
/// Owned by the token provider; the core treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The bearer token sent with each authenticated request.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential from a token and its expiry instant.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns true if the credential has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the credential has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Source of the current bearer credential.
///
/// Implemented by whatever session/identity layer hosts the engine. The
/// engine asks for the credential at each operation and treats an expired
/// or missing one as "unauthenticated" without issuing a request.
pub trait TokenProvider: Send + Sync {
    /// Returns the current credential, if one has been issued.
    fn credential(&self) -> Option<Credential>;

    /// Returns true if a non-expired credential is available.
    fn is_authenticated(&self) -> bool {
        self.credential().is_some_and(|c| !c.is_expired())
    }
}

/// A token provider holding a fixed credential.
///
/// Useful for embedding the engine behind a session layer that pushes
/// fresh credentials in, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    credential: Option<Credential>,
}

impl StaticTokenProvider {
    /// Creates a provider with no credential (signed out).
    pub fn signed_out() -> Self {
        Self { credential: None }
    }

    /// Creates a provider with the given credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_by_timestamp() {
        let now = Utc::now();
        let credential = Credential::new("tok", now + Duration::hours(1));

        assert!(!credential.is_expired_at(now));
        assert!(credential.is_expired_at(now + Duration::hours(1))); // boundary is expired
        assert!(credential.is_expired_at(now + Duration::hours(2)));
    }

    #[test]
    fn static_provider_authenticated() {
        let credential = Credential::new("tok", Utc::now() + Duration::hours(1));
        let provider = StaticTokenProvider::with_credential(credential);

        assert!(provider.is_authenticated());
        assert_eq!(provider.credential().unwrap().token, "tok");
    }

    #[test]
    fn static_provider_signed_out() {
        let provider = StaticTokenProvider::signed_out();
        assert!(!provider.is_authenticated());
        assert!(provider.credential().is_none());
    }

    #[test]
    fn expired_credential_is_not_authenticated() {
        let credential = Credential::new("tok", Utc::now() - Duration::minutes(5));
        let provider = StaticTokenProvider::with_credential(credential);

        assert!(!provider.is_authenticated());
        // The credential itself is still readable; only the predicate changes.
        assert!(provider.credential().is_some());
    }
}
