use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RegistrationRequest;

/// Request body for POST users/register.json
///
/// Every field travels as a string, `tnc` included.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterBody {
    pub email: String,
    pub uuid: String,
    pub data: String,
    pub tnc: String,
}

impl From<&RegistrationRequest> for RegisterBody {
    fn from(request: &RegistrationRequest) -> Self {
        Self {
            email: request.email.clone(),
            uuid: request.client_id.hyphenated().to_string().to_uppercase(),
            data: request.nonce.clone(),
            tnc: if request.accepted_terms { "true" } else { "false" }.to_string(),
        }
    }
}

/// Envelope returned by GET spot_price.json
///
/// Fields are optional so that a body with missing keys still decodes and
/// can be reported as a malformed response rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotPriceEnvelope {
    pub result: Option<String>,
    pub data: Option<SpotPriceData>,
}

/// Nested `data` object of the spot price response
#[derive(Debug, Clone, Deserialize)]
pub struct SpotPriceData {
    pub timestamp: Option<String>,
    pub spot_price: Option<f64>,
}

/// Error type for HelloGold API operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Connectivity failure or non-2xx status
    #[error("Transport failure: {0}")]
    Transport(String),
    /// Body arrived but is missing or mismatching expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
