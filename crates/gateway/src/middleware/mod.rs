//! HTTP middleware

pub mod error_path;
pub mod rate_limit;
pub mod request_metrics;
