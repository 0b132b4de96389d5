//! Order Desk - an in-memory order management demo
//!
//! A single session state (catalog, orders, customer) is owned by an
//! [`OrderEngine`]. Five presentation sections read snapshots of it and call
//! engine operations; every operation produces a toast.
//!
//! # Architecture
//!
//! ```text
//!  ┌───────────────┐   operation    ┌──────────────┐   OrderAction   ┌──────────────┐
//!  │   Sections    │ ─────────────▶ │ OrderEngine  │ ──────────────▶ │ OrderReducer │
//!  │ (view models) │                └──────────────┘                 └──────────────┘
//!  └───────────────┘                       │                                │
//!          ▲                               │ Arc<DemoState>                 │ Effect::Notify
//!          │        watch::Receiver        ▼                                ▼
//!          └────────────────────────── Store ────────────────────────▶ ToastQueue
//! ```
//!
//! # Order lifecycle
//!
//! ```text
//! Pending ──▶ Confirmed ──▶ Processing ──▶ Shipped
//! ```
//!
//! Transitions only move forward. Stages may be skipped; going back or
//! re-entering the current stage is rejected.
//!
//! # Example
//!
//! ```
//! use order_desk::{DemoConfig, OrderEngine, OrderStatus, ProductId};
//!
//! let engine = OrderEngine::new(DemoConfig::default());
//! let order = engine.create_order(&ProductId::new("prod-002"), 3)?;
//! assert_eq!(order.status, OrderStatus::Pending);
//! assert_eq!(order.total.to_string(), "$1499.97");
//!
//! engine.confirm_order(&order.id)?;
//! assert_eq!(engine.orders_by_status(OrderStatus::Confirmed).len(), 1);
//! # Ok::<(), order_desk::OrderError>(())
//! ```

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod reducer;
pub mod sections;
pub mod seed;
pub mod types;

pub use analytics::OrderAnalytics;
pub use config::{ConfigError, DemoConfig};
pub use engine::OrderEngine;
pub use error::OrderError;
pub use reducer::{OrderEnvironment, OrderPolicy, OrderReducer, RandomIdGenerator};
pub use types::{
    Customer, CustomerId, CustomerNote, DemoState, Money, NoteId, Order, OrderAction, OrderId,
    OrderStatus, Product, ProductId, Role,
};
