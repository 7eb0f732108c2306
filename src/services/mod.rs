pub mod price_service;
pub mod registration_service;
