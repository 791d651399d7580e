//! Identity: who is signed in, and the mock sign-in used by the storefront.
//!
//! The mock backend keeps plaintext credentials. This is a demo login,
//! not an authentication scheme.

use std::sync::{Arc, RwLock};

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Exposes the currently authenticated user, if any.
pub trait IdentityProvider: Send + Sync {
    /// Returns the signed-in user, or `None` for an anonymous shopper.
    fn current_user(&self) -> Option<UserId>;
}

/// Sign-in state for one shopper session.
///
/// Clones share state, so the sequencer and the UI layer can hold the
/// same identity.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    user: Arc<RwLock<Option<UserId>>>,
}

impl SessionIdentity {
    /// Creates an anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a session already signed in as `user`.
    pub fn signed_in(user: UserId) -> Self {
        let identity = Self::default();
        identity.sign_in(user);
        identity
    }

    /// Records `user` as signed in.
    pub fn sign_in(&self, user: UserId) {
        if let Ok(mut current) = self.user.write() {
            *current = Some(user);
        }
    }

    /// Forgets the signed-in user.
    pub fn sign_out(&self) {
        if let Ok(mut current) = self.user.write() {
            *current = None;
        }
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.read().ok().and_then(|user| user.clone())
    }
}

/// A user record from the mock backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockUser {
    pub id: UserId,
    pub email: String,
    pub password: String,
}

/// The mock backend's user list.
#[derive(Debug, Clone, Default)]
pub struct MockUserDirectory {
    users: Vec<MockUser>,
}

impl MockUserDirectory {
    /// Creates a directory from a user list.
    pub fn new(users: Vec<MockUser>) -> Self {
        Self { users }
    }

    /// Returns the user whose email and password both match.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()) && user.password == password)
            .map(|user| user.id.clone())
            .ok_or(AuthError::InvalidCredentials)
    }
}
