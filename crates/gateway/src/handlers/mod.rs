//! API handlers module

pub mod clients;
pub mod health;
pub mod payments;
pub mod sessions;
