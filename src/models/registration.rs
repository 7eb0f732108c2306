//! Sign-up models

use uuid::Uuid;

/// One registration attempt. Built fresh per submit and dropped once the call settles.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    /// Trimmed, validated address
    pub email: String,
    pub client_id: Uuid,
    /// 32 random alphanumeric characters
    pub nonce: String,
    pub accepted_terms: bool,
}
