//! Authentication boundary
//!
//! The game core only needs register/login; the credential store is an
//! external collaborator with no schema beyond identity. Login retry
//! and the surrounding menu live in the binary, outside the core.

use std::collections::HashMap;

/// Opaque authenticated-identity handle carried by the session
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    pub id: String,
}

/// External credential store contract
pub trait Authenticator {
    /// Register a new identity; false if the id is already taken
    fn register(&mut self, id: &str, pw: &str, name: &str) -> bool;

    /// Check credentials; true on success
    fn login(&self, id: &str, pw: &str) -> bool;
}

struct UserRecord {
    password: String,
    #[allow(dead_code)]
    name: String,
}

/// In-process credential store (nothing is persisted across runs)
#[derive(Default)]
pub struct MemoryAuthenticator {
    users: HashMap<String, UserRecord>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Authenticator for MemoryAuthenticator {
    fn register(&mut self, id: &str, pw: &str, name: &str) -> bool {
        if id.is_empty() || self.users.contains_key(id) {
            return false;
        }
        self.users.insert(
            id.to_string(),
            UserRecord {
                password: pw.to_string(),
                name: name.to_string(),
            },
        );
        true
    }

    fn login(&self, id: &str, pw: &str) -> bool {
        self.users
            .get(id)
            .map_or(false, |user| user.password == pw)
    }
}
