pub mod client;
pub mod models;

pub use client::{HelloGoldApi, HelloGoldClient};
pub use models::{ApiError, RegisterBody, SpotPriceEnvelope};
