//! Fixed username → password-hash lookup used by the login screen.
//!
//! Passwords are never stored in clear text: each entry holds the
//! lowercase hex SHA-256 digest of the password.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Demo accounts used when no credential list is configured.
const DEFAULT_USERS: [(&str, &str); 2] = [("admin", "1234"), ("user", "senha")];

/// Hash a password with SHA-256 and hex-encode the digest.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());

    hex::encode(hasher.finalize())
}

/// Immutable credential mapping, fixed at process start.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from `(username, password_hash)` pairs.
    pub fn from_hashes<I, U, H>(entries: I) -> Self
    where
        I: IntoIterator<Item = (U, H)>,
        U: Into<String>,
        H: Into<String>,
    {
        Self {
            users: entries
                .into_iter()
                .map(|(user, hash)| (user.into(), hash.into().to_ascii_lowercase()))
                .collect(),
        }
    }

    /// The built-in demo accounts (`admin` / `1234`, `user` / `senha`).
    pub fn with_default_users() -> Self {
        Self::from_hashes(
            DEFAULT_USERS
                .iter()
                .map(|(user, password)| (*user, hash_password(password))),
        )
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield `false`; callers
    /// cannot tell the two apart.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(stored) => stored.as_bytes() == hash_password(password).as_bytes(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
