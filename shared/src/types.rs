//! Core domain enums shared across the marketplace
//!
//! These types define the closed vocabularies of the order pipeline: who is
//! acting ([`Role`]), where an order is in its lifecycle ([`OrderStatus`]),
//! how its payment stands ([`PaymentStatus`]) and which legacy table a cart
//! modifier lives in ([`ModifierKind`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actor role carried in JWT claims and checked at every authorization gate.
///
/// The set is closed: gates match exhaustively so a new role cannot slip
/// through authorization unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Merchant,
    Rider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Merchant => "merchant",
            Role::Rider => "rider",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "merchant" => Ok(Role::Merchant),
            "rider" => Ok(Role::Rider),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Order lifecycle status
///
/// The forward path is strictly linear:
///
/// ```text
/// PENDING -> ACCEPTED -> PREPARING -> READY_FOR_PICKUP -> IN_TRANSIT -> DELIVERED
/// ```
///
/// `CANCELLED` is reachable only while the order has not left the kitchen
/// (pending, accepted or preparing). `DELIVERED` and `CANCELLED` are
/// terminal; no edges leave them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    ReadyForPickup,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the cancellation window is still open in this state.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Accepted | OrderStatus::Preparing
        )
    }

    /// Whether `next` is a legal transition from this state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Cancelled)
                | (Accepted, Preparing)
                | (Accepted, Cancelled)
                | (Preparing, ReadyForPickup)
                | (Preparing, Cancelled)
                | (ReadyForPickup, InTransit)
                | (InTransit, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment standing of an order, recorded verbatim and never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind discriminator for cart modifiers.
///
/// Each kind maps to one legacy catalog table with its own column names;
/// the catalog resolver owns that mapping. An unrecognized kind string is
/// rejected at deserialization, before any lookup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Pack,
    Side,
    SectionItem,
}

impl ModifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::Pack => "pack",
            ModifierKind::Side => "side",
            ModifierKind::SectionItem => "section_item",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
