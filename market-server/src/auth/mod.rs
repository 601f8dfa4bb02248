//! Authentication module
//!
//! JWT validation and the request actor:
//! - [`JwtService`] - token validation service
//! - [`CurrentUser`] - authenticated actor (id + role), extracted per request

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
