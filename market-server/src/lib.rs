//! Mango Market Server - multi-tenant food and retail marketplace backend
//!
//! # Architecture overview
//!
//! This crate is the order backbone of the marketplace. A customer's cart
//! comes in over HTTP, is priced against the live catalog, persisted
//! atomically, and then driven through a fixed delivery lifecycle by the
//! merchant and the assigned rider:
//!
//! - **Catalog resolution** (`catalog`): price and name lookups across the
//!   food and generic catalogs, modifier tables included
//! - **Order pipeline** (`orders`): quantity caps, decimal pricing, the
//!   status machine and response presentation
//! - **Persistence** (`db`): embedded SurrealDB storage with transactional
//!   multi-row order writes
//! - **Authentication** (`auth`): JWT validation and the request actor
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server, boot errors
//! ├── auth/          # JWT validation, request extractor
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # Catalog and modifier resolution
//! ├── orders/        # Pricing, quantity caps, status machine, presenter
//! ├── notify/        # Post-commit order notifications
//! ├── db/            # Database layer, schema, repositories
//! └── utils/         # Logger, relative time
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /___ _____  ____ _____
  / /|_/ / __ `/ __ \/ __ `/ __ \
 / /  / / /_/ / / / / /_/ / /_/ /
/_/  /_/\__,_/_/ /_/\__, /\____/
                   /____/
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}
