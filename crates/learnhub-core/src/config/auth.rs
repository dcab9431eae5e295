//! Identity token configuration.
//!
//! LearnHub does not manage credentials itself. The external auth provider
//! issues HS256 JWTs; this section holds what is needed to validate them.

use serde::{Deserialize, Serialize};

/// Identity token validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for JWT validation (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected token issuer. Empty disables the issuer check.
    #[serde(default)]
    pub issuer: String,
    /// Clock skew tolerance for `exp`/`nbf` in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: String::new(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    30
}
