//! Status/Authorization Gate
//!
//! Validates a requested transition against the state machine and the
//! actor's role and identity before anything mutates. Merchants drive
//! accepted/preparing/ready_for_pickup, the assigned rider drives
//! in_transit/delivered, cancellation belongs to the customer or merchant
//! while the order has not left the kitchen, and admin passes the read
//! gate everywhere but takes no lifecycle transitions of its own.

use crate::auth::CurrentUser;
use crate::db::models::OrderHeader;
use shared::error::{AppError, ErrorCode};
use shared::types::{OrderStatus, Role};

pub struct StatusGate;

impl StatusGate {
    /// Check a requested transition; the error identifies which rule
    /// rejected it. Nothing is mutated here.
    pub fn authorize(
        actor: &CurrentUser,
        order: &OrderHeader,
        next: OrderStatus,
    ) -> Result<(), AppError> {
        if order.status.is_terminal() {
            return Err(
                AppError::new(ErrorCode::OrderTerminal).with_detail("status", order.status.as_str())
            );
        }
        if next == OrderStatus::Cancelled {
            if !order.status.can_cancel() {
                return Err(AppError::new(ErrorCode::CancellationWindowClosed)
                    .with_detail("status", order.status.as_str()));
            }
        } else if !order.status.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!(
                    "Cannot move order from {} to {}",
                    order.status.as_str(),
                    next.as_str()
                ),
            ));
        }

        match next {
            OrderStatus::Accepted | OrderStatus::Preparing | OrderStatus::ReadyForPickup => {
                Self::require_owning_merchant(actor, order)
            }
            OrderStatus::InTransit | OrderStatus::Delivered => {
                Self::require_assigned_rider(actor, order)
            }
            OrderStatus::Cancelled => Self::require_cancel_party(actor, order),
            // No edge leads back into pending
            OrderStatus::Pending => Err(AppError::new(ErrorCode::InvalidStatusTransition)),
        }
    }

    /// Read access: the placing customer, the store's merchant, the
    /// assigned rider, and admins.
    pub fn authorize_read(actor: &CurrentUser, order: &OrderHeader) -> Result<(), AppError> {
        let allowed = match actor.role {
            Role::Admin => true,
            Role::Customer => order.customer_id == actor.id,
            Role::Merchant => order.merchant_id == actor.id,
            Role::Rider => order.rider_id == Some(actor.id),
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::NotOrderParticipant))
        }
    }

    /// Lifecycle column stamped when entering a status, if any
    pub const fn timestamp_field(status: OrderStatus) -> Option<&'static str> {
        match status {
            OrderStatus::Accepted => Some("accepted_at"),
            OrderStatus::ReadyForPickup => Some("ready_at"),
            OrderStatus::InTransit => Some("picked_up_at"),
            OrderStatus::Delivered => Some("delivered_at"),
            OrderStatus::Cancelled => Some("cancelled_at"),
            OrderStatus::Pending | OrderStatus::Preparing => None,
        }
    }

    fn require_owning_merchant(actor: &CurrentUser, order: &OrderHeader) -> Result<(), AppError> {
        match actor.role {
            Role::Merchant if order.merchant_id == actor.id => Ok(()),
            Role::Merchant => Err(AppError::new(ErrorCode::StoreNotOwned)),
            Role::Customer | Role::Rider | Role::Admin => Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "Only the store's merchant can perform this transition",
            )),
        }
    }

    fn require_assigned_rider(actor: &CurrentUser, order: &OrderHeader) -> Result<(), AppError> {
        match actor.role {
            Role::Rider => match order.rider_id {
                None => Err(AppError::new(ErrorCode::RiderNotAssigned)),
                Some(rider_id) if rider_id == actor.id => Ok(()),
                Some(_) => Err(AppError::with_message(
                    ErrorCode::NotOrderParticipant,
                    "Order is assigned to a different rider",
                )),
            },
            Role::Customer | Role::Merchant | Role::Admin => Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "Only the assigned rider can perform this transition",
            )),
        }
    }

    fn require_cancel_party(actor: &CurrentUser, order: &OrderHeader) -> Result<(), AppError> {
        match actor.role {
            Role::Customer if order.customer_id == actor.id => Ok(()),
            Role::Merchant if order.merchant_id == actor.id => Ok(()),
            Role::Customer | Role::Merchant => Err(AppError::with_message(
                ErrorCode::NotOrderParticipant,
                "Only this order's customer or merchant can cancel it",
            )),
            Role::Rider | Role::Admin => Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "Only the customer or the merchant can cancel an order",
            )),
        }
    }
}
