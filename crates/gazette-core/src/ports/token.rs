//! Identity token port.
//!
//! Gazette does not manage credentials; the external authentication system
//! issues tokens and this port validates them into an identity.

use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Token service trait for identity token operations.
pub trait TokenService: Send + Sync {
    /// Issue a token for a user.
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No credentials presented")]
    MissingAuth,
}
