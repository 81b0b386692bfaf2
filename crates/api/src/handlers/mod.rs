//! Request handlers

pub mod common;
pub mod health;
pub mod vehicles;

pub use health::{health, ready};
pub use vehicles::{delete_vehicle_cache, get_vehicle};
