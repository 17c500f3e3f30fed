// src/auth.rs

use std::sync::{Arc, RwLock};

use crate::utils::jwt::{self, JwtUser};

/// Where the user lands after logging in, decided by the role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    StudentDashboard,
    InstructorDashboard,
}

pub fn post_login_destination(role: Option<&str>) -> Destination {
    match role {
        Some("Instructor") => Destination::InstructorDashboard,
        _ => Destination::StudentDashboard,
    }
}

/// Session-wide authentication context.
///
/// Passed explicitly to everything that issues requests instead of an
/// ambient storage lookup. Populated at login, cleared at logout; reads
/// happen on every outgoing request, writes only on those two events.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Claims of the current token, if one is held and decodable.
    pub fn user(&self) -> Option<JwtUser> {
        self.token()
            .and_then(|token| jwt::user_from_token(&token).ok())
    }
}
