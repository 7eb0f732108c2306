//! Data models shared by services, the app state machine and commands
//!
//! Each model is a plain typed record; wire representations live next to the
//! API client in `api::hellogold::models`.

pub mod alert;
pub mod price;
pub mod registration;

pub use alert::Alert;
pub use price::PricePoint;
pub use registration::RegistrationRequest;
