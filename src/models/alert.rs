//! User-facing alert models

/// A blocking modal with a single acknowledgement action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub action: String,
}

impl Alert {
    /// The generic alert shown when a sign-up submission fails
    pub fn sign_up_failed() -> Self {
        Self {
            title: "Sign Up Error".to_string(),
            message: "Unable to submit form. Please try again.".to_string(),
            action: "OK".to_string(),
        }
    }
}
