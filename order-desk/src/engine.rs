//! The order engine: the single mutation and query surface of the demo.
//!
//! Each operation sends one [`OrderAction`] through the store and reads the
//! snapshot published for it. A rejected command comes back as the `Err`
//! recorded in [`DemoState::last_error`]; the toast for it has already been
//! delivered to the engine's [`ToastQueue`] by then.

use crate::analytics::OrderAnalytics;
use crate::config::DemoConfig;
use crate::error::OrderError;
use crate::reducer::{OrderEnvironment, OrderPolicy, OrderReducer};
use crate::types::{
    Customer, CustomerNote, DemoState, Order, OrderAction, OrderId, OrderStatus, Product,
    ProductId, Role,
};
use order_desk_runtime::{Store, ToastQueue};
use std::sync::Arc;
use tokio::sync::watch;

type OrderStore = Store<DemoState, OrderAction, OrderEnvironment, OrderReducer>;

/// Owner of the demo session state
pub struct OrderEngine {
    store: OrderStore,
    toasts: ToastQueue,
    config: DemoConfig,
}

impl OrderEngine {
    /// A fresh seeded session with the system clock and random ids
    #[must_use]
    pub fn new(config: DemoConfig) -> Self {
        Self::with_environment(config, OrderEnvironment::production())
    }

    /// A fresh seeded session with injected dependencies
    #[must_use]
    pub fn with_environment(config: DemoConfig, environment: OrderEnvironment) -> Self {
        let toasts = ToastQueue::new(config.toast_capacity);
        let reducer = OrderReducer::new(OrderPolicy::from(&config));
        let store = Store::with_sink(
            DemoState::seeded(),
            reducer,
            environment,
            Arc::new(toasts.clone()),
        );

        tracing::info!(
            products = store.state(|s| s.catalog.len()),
            low_stock_threshold = config.low_stock_threshold,
            "Order engine started"
        );

        Self {
            store,
            toasts,
            config,
        }
    }

    fn dispatch(&self, action: OrderAction) -> Result<Arc<DemoState>, OrderError> {
        let snapshot = self.store.send(action)?;
        match &snapshot.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(snapshot),
        }
    }

    /// Create a pending order and take its units out of stock.
    ///
    /// # Errors
    ///
    /// [`OrderError::InvalidQuantity`], [`OrderError::ProductNotFound`] or
    /// [`OrderError::InsufficientStock`]; nothing changes in those cases.
    pub fn create_order(&self, product_id: &ProductId, quantity: u32) -> Result<Order, OrderError> {
        let snapshot = self.dispatch(OrderAction::CreateOrder {
            product_id: product_id.clone(),
            quantity,
        })?;
        snapshot
            .orders
            .first()
            .cloned()
            .ok_or_else(|| OrderError::Store("created order missing from snapshot".to_string()))
    }

    /// Move an order to `confirmed`.
    ///
    /// Returns `Ok(None)` when the id is unknown and unknown orders are
    /// ignored by configuration.
    ///
    /// # Errors
    ///
    /// [`OrderError::OrderNotFound`] or [`OrderError::InvalidTransition`].
    pub fn confirm_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
        self.transition(order_id, |order_id| OrderAction::ConfirmOrder { order_id })
    }

    /// Move an order to `processing`.
    ///
    /// # Errors
    ///
    /// Same as [`OrderEngine::confirm_order`].
    pub fn begin_fulfillment(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
        self.transition(order_id, |order_id| OrderAction::BeginFulfillment { order_id })
    }

    /// Move an order to `shipped`.
    ///
    /// # Errors
    ///
    /// Same as [`OrderEngine::confirm_order`].
    pub fn ship_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
        self.transition(order_id, |order_id| OrderAction::ShipOrder { order_id })
    }

    /// Move an order one stage forward.
    ///
    /// # Errors
    ///
    /// Same as [`OrderEngine::confirm_order`]; a shipped order cannot advance.
    pub fn advance_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
        self.transition(order_id, |order_id| OrderAction::AdvanceOrder { order_id })
    }

    fn transition(
        &self,
        order_id: &OrderId,
        action: fn(OrderId) -> OrderAction,
    ) -> Result<Option<Order>, OrderError> {
        let snapshot = self.dispatch(action(order_id.clone()))?;
        Ok(snapshot.order(order_id).cloned())
    }

    /// Receive (positive `delta`) or remove (negative `delta`) stock.
    ///
    /// # Errors
    ///
    /// [`OrderError::ProductNotFound`], or [`OrderError::NegativeStock`]
    /// unless backorders are allowed.
    pub fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<Product, OrderError> {
        let snapshot = self.dispatch(OrderAction::AdjustStock {
            product_id: product_id.clone(),
            delta,
        })?;
        snapshot
            .product(product_id)
            .cloned()
            .ok_or_else(|| OrderError::ProductNotFound {
                product_id: product_id.clone(),
            })
    }

    /// Prepend a note to the customer record.
    ///
    /// # Errors
    ///
    /// [`OrderError::EmptyNote`] for blank content.
    pub fn add_customer_note(&self, content: &str) -> Result<CustomerNote, OrderError> {
        let snapshot = self.dispatch(OrderAction::AddCustomerNote {
            content: content.to_string(),
        })?;
        snapshot
            .customer
            .notes
            .first()
            .cloned()
            .ok_or_else(|| OrderError::Store("added note missing from snapshot".to_string()))
    }

    /// Throw away the session and start over from seed data.
    ///
    /// # Errors
    ///
    /// Only runtime failures ([`OrderError::Store`]).
    pub fn reset(&self) -> Result<(), OrderError> {
        self.dispatch(OrderAction::ResetSession).map(|_| ())
    }

    /// The latest snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<DemoState> {
        self.store.snapshot()
    }

    /// Receive every snapshot published from now on
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<DemoState>> {
        self.store.subscribe()
    }

    /// Orders with exactly this status, newest first
    #[must_use]
    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.store.state(|s| s.orders_by_status(status))
    }

    /// Orders shown to sales staff
    #[must_use]
    pub fn orders_for_salesperson(&self) -> Vec<Order> {
        self.orders_for(Role::Salesperson)
    }

    /// Orders shown to the back office
    #[must_use]
    pub fn orders_for_admin(&self) -> Vec<Order> {
        self.orders_for(Role::Admin)
    }

    /// Orders shown to `role`
    #[must_use]
    pub fn orders_for(&self, role: Role) -> Vec<Order> {
        self.store.state(|s| s.orders_for_role(role))
    }

    /// Looks up a product
    #[must_use]
    pub fn product(&self, product_id: &ProductId) -> Option<Product> {
        self.store.state(|s| s.product(product_id).cloned())
    }

    /// Looks up an order
    #[must_use]
    pub fn order(&self, order_id: &OrderId) -> Option<Order> {
        self.store.state(|s| s.order(order_id).cloned())
    }

    /// The catalog in seed order
    #[must_use]
    pub fn catalog(&self) -> Vec<Product> {
        self.store.state(|s| s.catalog.clone())
    }

    /// The customer with notes, newest first
    #[must_use]
    pub fn customer(&self) -> Customer {
        self.store.state(|s| s.customer.clone())
    }

    /// Sales and inventory figures for the current snapshot
    #[must_use]
    pub fn analytics(&self) -> OrderAnalytics {
        self.store
            .state(|s| OrderAnalytics::from_state(s, self.config.low_stock_threshold))
    }

    /// Notifications emitted by this engine
    #[must_use]
    pub const fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// The configuration this engine was built with
    #[must_use]
    pub const fn config(&self) -> &DemoConfig {
        &self.config
    }
}

impl Default for OrderEngine {
    fn default() -> Self {
        Self::new(DemoConfig::default())
    }
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("config", &self.config)
            .field("toasts", &self.toasts.len())
            .finish_non_exhaustive()
    }
}
