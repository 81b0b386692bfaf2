//! Shared primitive models used across the service

pub mod plate;
pub mod secret_string;

pub use plate::{Plate, PlateError};
pub use secret_string::SecretString;
