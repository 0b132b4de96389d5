//! Errors reported by the order engine.
//!
//! None of these are fatal. Each one is surfaced to the user as an error
//! notification and returned to the caller; state is left untouched.

use crate::types::{OrderId, OrderStatus, ProductId};
use order_desk_runtime::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a command was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderError {
    /// The product id is not in the catalog
    #[error("Product {product_id} not found")]
    ProductNotFound {
        /// Requested product
        product_id: ProductId,
    },

    /// More units were requested than are in stock
    #[error("Insufficient stock for {product_id}: requested {requested}, only {available} available")]
    InsufficientStock {
        /// Requested product
        product_id: ProductId,
        /// Units requested
        requested: u32,
        /// Units actually in stock
        available: i64,
    },

    /// Orders need at least one unit
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The order id does not match any order
    #[error("Order {order_id} not found")]
    OrderNotFound {
        /// Requested order
        order_id: OrderId,
    },

    /// The target status is not ahead of the current one
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Order being moved
        order_id: OrderId,
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// A stock adjustment would leave the product below zero
    #[error("Cannot adjust {product_id} by {delta}: only {available} in stock")]
    NegativeStock {
        /// Adjusted product
        product_id: ProductId,
        /// Units in stock before the adjustment
        available: i64,
        /// Requested change
        delta: i64,
    },

    /// The order form was submitted without choosing a product
    #[error("Select a product first")]
    NoProductSelected,

    /// Customer notes cannot be blank
    #[error("Note content cannot be empty")]
    EmptyNote,

    /// The store runtime failed to process the command
    #[error("Store failure: {0}")]
    Store(String),
}

impl OrderError {
    /// Headline shown on the error toast
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ProductNotFound { .. } => "Product not found",
            Self::InsufficientStock { .. } => "Not enough stock",
            Self::InvalidQuantity => "Invalid quantity",
            Self::OrderNotFound { .. } => "Order not found",
            Self::InvalidTransition { .. } => "Invalid status change",
            Self::NegativeStock { .. } => "Stock cannot go negative",
            Self::NoProductSelected => "No product selected",
            Self::EmptyNote => "Empty note",
            Self::Store(_) => "Something went wrong",
        }
    }

    /// Stable label for metrics
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ProductNotFound { .. } => "product_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InvalidQuantity => "invalid_quantity",
            Self::OrderNotFound { .. } => "order_not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::NegativeStock { .. } => "negative_stock",
            Self::NoProductSelected => "no_product_selected",
            Self::EmptyNote => "empty_note",
            Self::Store(_) => "store",
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}
