//! Caller identity resolution.
//!
//! The engine never authenticates anyone itself; whatever surface embeds it
//! (HTTP middleware, a CLI, a test) resolves the caller and hands the engine
//! an [`IdentityResolver`]. Mutations fail with
//! [`CoreError::NotAuthenticated`](candid_core::error::CoreError) when no
//! identity is present; queries degrade to empty results instead.

use candid_core::types::DbId;

/// Resolves the identity attached to the current call.
pub trait IdentityResolver: Send + Sync {
    /// The authenticated user, or `None` for an anonymous caller.
    fn current_user_id(&self) -> Option<DbId>;
}

/// A fixed identity, for tests and single-user embeddings.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(Option<DbId>);

impl FixedIdentity {
    /// An identity resolving to the given user.
    pub fn user(id: DbId) -> Self {
        Self(Some(id))
    }

    /// An identity resolving to nobody.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityResolver for FixedIdentity {
    fn current_user_id(&self) -> Option<DbId> {
        self.0
    }
}
