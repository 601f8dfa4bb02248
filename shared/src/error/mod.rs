//! Unified error system for the Mango marketplace backend
//!
//! Every failure that crosses a process or API boundary is described by a
//! numeric [`ErrorCode`]. Codes are grouped into categories by range so that
//! clients (and log pipelines) can classify a failure without a lookup table:
//!
//! - 0: success
//! - 1-999: general / validation errors
//! - 1000-1999: authentication errors
//! - 2000-2999: permission errors
//! - 3000-3999: store errors
//! - 4000-4999: order errors
//! - 5000-5999: payment errors
//! - 6000-6999: catalog errors
//! - 9000-9999: system errors
//!
//! [`AppError`] couples a code with a human-readable message and optional
//! structured details; [`ApiResponse`] is the uniform HTTP envelope built
//! from it.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, AppResult, ErrorCode};
//!
//! fn find_order(id: i64) -> AppResult<()> {
//!     if id <= 0 {
//!         return Err(AppError::new(ErrorCode::OrderNotFound)
//!             .with_detail("order_id", id));
//!     }
//!     Ok(())
//! }
//!
//! let err = find_order(-1).unwrap_err();
//! assert_eq!(err.code, ErrorCode::OrderNotFound);
//! assert_eq!(err.http_status().as_u16(), 404);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
