//! Photo Studio Common Library
//!
//! Shared code for the photo studio services including:
//! - Database models, schema bootstrap and repository
//! - Payment status updates and contract completion
//! - Photo delivery status
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod patch;
pub mod payments;
pub mod photos;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use payments::{PaymentPatch, PaymentService, PaymentView};
pub use photos::{PhotosPatch, PhotosView};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
