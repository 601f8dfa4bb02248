//! Shared types for the Mango marketplace backend
//!
//! Common types used across crates: error codes and the unified
//! error/response structures, core domain enums, and ID utilities.

pub mod error;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use types::{ModifierKind, OrderStatus, PaymentStatus, Role};
