//! Utility module - logging, relative time, re-exported error types
//!
//! # Contents
//!
//! - [`AppError`] - application error type (from `shared::error`)
//! - [`ApiResponse`] - API response envelope (from `shared::error`)
//! - [`logger`] - tracing subscriber setup
//! - [`time`] - relative time formatting

pub mod logger;
pub mod time;

// Re-export the unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
