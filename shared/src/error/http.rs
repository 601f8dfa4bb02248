//! HTTP status mapping for [`ErrorCode`]
//!
//! The numeric code is the contract; the HTTP status is derived from it so
//! every handler returns the same status for the same failure class.

use http::StatusCode;

use super::codes::ErrorCode;

impl ErrorCode {
    /// Map this error code to the HTTP status it travels under.
    ///
    /// Codes without an explicit mapping are client errors (400).
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // Missing resources
            Self::NotFound
            | Self::StoreNotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::ItemNotFound
            | Self::ModifierNotFound => StatusCode::NOT_FOUND,

            // State conflicts: the request is well-formed but the current
            // state of the order or catalog forbids it
            Self::AlreadyExists
            | Self::QuantityExceedsCap
            | Self::InvalidStatusTransition
            | Self::OrderTerminal
            | Self::RiderNotAssigned
            | Self::RiderAlreadyAssigned
            | Self::CancellationWindowClosed
            | Self::PaymentAlreadyRefunded => StatusCode::CONFLICT,

            // Authentication failures
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // Authenticated but not allowed
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::AdminRequired
            | Self::NotOrderParticipant
            | Self::StoreNotOwned => StatusCode::FORBIDDEN,

            // Upstream / infrastructure
            Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            _ => StatusCode::BAD_REQUEST,
        }
    }
}
