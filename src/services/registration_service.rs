use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::hellogold::{ApiError, HelloGoldApi, RegisterBody};
use crate::models::RegistrationRequest;

/// Length of the random `data` field sent with each registration
pub const NONCE_LENGTH: usize = 32;

/// Shown while a submission is in flight
pub const LOADING_MESSAGE: &str = "Signing up...";

const TLD_MIN: usize = 2;
const TLD_MAX: usize = 64;

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-')
}

/// Validate an email address
///
/// Whole-string match of `[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}`.
/// No trimming happens here; callers trim first.
pub fn validate_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };

    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }

    // '@' is in neither character class, so a second one fails here too
    if !domain.chars().all(is_domain_char) {
        return false;
    }

    // The suffix is letters only, so it can only start after the last dot
    let Some(dot) = domain.rfind('.') else {
        return false;
    };
    let (host, suffix) = (&domain[..dot], &domain[dot + 1..]);

    !host.is_empty()
        && (TLD_MIN..=TLD_MAX).contains(&suffix.len())
        && suffix.chars().all(|c| c.is_ascii_alphabetic())
}

/// Generate a random string from the 62-symbol alphanumeric alphabet
pub fn generate_nonce(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Trim and validate, then build a fresh request. `None` when the address is invalid.
pub fn build_request(email: &str, accepted_terms: bool) -> Option<RegistrationRequest> {
    let email = email.trim();
    if !validate_email(email) {
        return None;
    }

    Some(RegistrationRequest {
        email: email.to_string(),
        client_id: Uuid::new_v4(),
        nonce: generate_nonce(NONCE_LENGTH),
        accepted_terms,
    })
}

/// Submit a registration
///
/// Returns `None` without touching the network when the trimmed address does
/// not validate. Otherwise resolves to the trimmed address on any 2xx answer.
pub async fn submit(
    api: &dyn HelloGoldApi,
    email: &str,
    accepted_terms: bool,
) -> Option<Result<String, ApiError>> {
    let Some(request) = build_request(email, accepted_terms) else {
        debug!("Skipping submission: email failed validation");
        return None;
    };

    info!("Submitting registration for {}", request.email);
    let body = RegisterBody::from(&request);

    let outcome = match api.register(&body).await {
        Ok(()) => {
            info!("Registration accepted for {}", request.email);
            Ok(request.email)
        }
        Err(e) => {
            warn!("Registration failed for {}: {}", request.email, e);
            Err(e)
        }
    };

    Some(outcome)
}

/// State of the sign-up form
///
/// `submit_enabled` is recomputed on every change to the email field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    email: String,
    accepted_terms: bool,
    submit_enabled: bool,
}

impl SignUpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn accepted_terms(&self) -> bool {
        self.accepted_terms
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// Replace the email text and re-evaluate the submit button
    pub fn set_email(&mut self, text: &str) {
        self.email = text.to_string();
        self.submit_enabled = validate_email(self.email.trim());
    }

    pub fn set_accepted_terms(&mut self, accepted: bool) {
        self.accepted_terms = accepted;
    }

    /// Clear everything, as when the user signs out of the price list
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
