//! Per-request caller identity.

use chrono::{DateTime, Utc};
use learnhub_entity::user::UserRole;
use uuid::Uuid;

/// Identity of the authenticated caller, extracted from the access token.
///
/// LearnHub delegates identity to an external auth provider, so there is no
/// local user table. The token subject is the user id and the role claim
/// decides moderation rights.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Authenticated user id (token subject).
    pub user_id: Uuid,
    /// Role claim from the token.
    pub role: UserRole,
    /// When the request was admitted.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Whether the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
