//! Order reducer implementing the order desk business logic.
//!
//! The reducer is the only code that mutates [`DemoState`]. Every command is
//! validated up front; a rejected command records `last_error`, emits an error
//! notification and leaves catalog, orders and customer untouched.

use crate::config::DemoConfig;
use crate::error::OrderError;
use crate::types::{
    CustomerNote, DemoState, NoteId, Order, OrderAction, OrderId, OrderStatus, Product,
    ProductId,
};
use order_desk_core::effect::Effect;
use order_desk_core::environment::{Clock, IdGenerator, SystemClock};
use order_desk_core::notification::Notification;
use order_desk_core::reducer::Reducer;
use order_desk_core::{smallvec, SmallVec};
use std::sync::Arc;
use uuid::Uuid;

type Effects = SmallVec<[Effect<OrderAction>; 4]>;

/// Random ids of the form `{prefix}-{uuid}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

/// Environment for the order reducer containing dependencies
#[derive(Clone)]
pub struct OrderEnvironment {
    /// Clock for order and note timestamps
    pub clock: Arc<dyn Clock>,
    /// Id source for orders and notes
    pub ids: Arc<dyn IdGenerator>,
}

impl OrderEnvironment {
    /// Creates a new order environment
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random ids
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator))
    }
}

impl std::fmt::Debug for OrderEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEnvironment").finish_non_exhaustive()
    }
}

/// Business rules that vary with configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPolicy {
    /// Stock at or below this level triggers a warning
    pub low_stock_threshold: i64,
    /// Let stock adjustments go below zero
    pub allow_negative_stock: bool,
    /// Report unknown order ids instead of ignoring them
    pub reject_unknown_orders: bool,
}

impl From<&DemoConfig> for OrderPolicy {
    fn from(config: &DemoConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            allow_negative_stock: config.allow_negative_stock,
            reject_unknown_orders: config.reject_unknown_orders,
        }
    }
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self::from(&DemoConfig::default())
    }
}

/// Where a status transition is headed
#[derive(Debug, Clone, Copy)]
enum Target {
    Exact(OrderStatus),
    Next,
}

/// Reducer implementing order desk business logic
#[derive(Debug, Clone, Default)]
pub struct OrderReducer {
    policy: OrderPolicy,
}

impl OrderReducer {
    /// Creates a reducer with the given policy
    #[must_use]
    pub const fn new(policy: OrderPolicy) -> Self {
        Self { policy }
    }

    fn create_order(
        &self,
        state: &mut DemoState,
        product_id: &ProductId,
        quantity: u32,
        env: &OrderEnvironment,
    ) -> Result<Effects, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        let product = state
            .product_mut(product_id)
            .ok_or_else(|| OrderError::ProductNotFound {
                product_id: product_id.clone(),
            })?;

        if i64::from(quantity) > product.stock {
            return Err(OrderError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: product.stock,
            });
        }

        let snapshot = product.clone();
        product.stock -= i64::from(quantity);
        let remaining = product.clone();

        let now = env.clock.now();
        let order = Order {
            id: OrderId::new(env.ids.next_id("ord")),
            customer_id: state.customer.id.clone(),
            total: snapshot.price.times(u64::from(quantity)),
            product: snapshot,
            quantity,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            order_id = %order.id,
            product_id = %product_id,
            quantity,
            total = %order.total,
            "Order created"
        );
        metrics::counter!("orders.created").increment(1);

        let mut effects: Effects = smallvec![Effect::Notify(Notification::success(
            "Order created",
            format!(
                "{} × {} for {} ({})",
                quantity, order.product.name, order.total, order.id
            ),
        ))];
        if let Some(warning) = self.low_stock_warning(&remaining) {
            effects.push(warning);
        }

        state.orders.insert(0, order);
        Ok(effects)
    }

    fn transition(
        &self,
        state: &mut DemoState,
        order_id: &OrderId,
        target: Target,
        env: &OrderEnvironment,
    ) -> Result<Effects, OrderError> {
        let Some(order) = state.order_mut(order_id) else {
            if self.policy.reject_unknown_orders {
                return Err(OrderError::OrderNotFound {
                    order_id: order_id.clone(),
                });
            }
            tracing::debug!(order_id = %order_id, "Ignoring transition for unknown order");
            return Ok(smallvec![Effect::None]);
        };

        let from = order.status;
        let to = match target {
            Target::Exact(status) => status,
            Target::Next => from.next().unwrap_or(from),
        };

        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                order_id: order_id.clone(),
                from,
                to,
            });
        }

        order.status = to;
        order.updated_at = env.clock.now();

        tracing::info!(order_id = %order_id, %from, %to, "Order status changed");
        metrics::counter!("orders.transitions", "status" => to.to_string()).increment(1);

        let title = match to {
            OrderStatus::Pending => "Order reopened",
            OrderStatus::Confirmed => "Order confirmed",
            OrderStatus::Processing => "Fulfillment started",
            OrderStatus::Shipped => "Order shipped",
        };
        Ok(smallvec![Effect::Notify(Notification::success(
            title,
            format!("{order_id} is now {to}"),
        ))])
    }

    fn adjust_stock(
        &self,
        state: &mut DemoState,
        product_id: &ProductId,
        delta: i64,
    ) -> Result<Effects, OrderError> {
        let product = state
            .product_mut(product_id)
            .ok_or_else(|| OrderError::ProductNotFound {
                product_id: product_id.clone(),
            })?;

        let resulting = product.stock.saturating_add(delta);
        if resulting < 0 && !self.policy.allow_negative_stock {
            return Err(OrderError::NegativeStock {
                product_id: product_id.clone(),
                available: product.stock,
                delta,
            });
        }

        product.stock = resulting;
        let adjusted = product.clone();

        tracing::info!(product_id = %product_id, delta, stock = resulting, "Stock adjusted");

        let message = match delta {
            d if d > 0 => format!("Received {d} units of {} (now {resulting})", adjusted.name),
            d if d < 0 => format!(
                "Removed {} units of {} (now {resulting})",
                d.unsigned_abs(),
                adjusted.name
            ),
            _ => format!("{} unchanged at {resulting}", adjusted.name),
        };

        let mut effects: Effects =
            smallvec![Effect::Notify(Notification::success("Stock adjusted", message))];
        if delta < 0 {
            if let Some(warning) = self.low_stock_warning(&adjusted) {
                effects.push(warning);
            }
        }
        Ok(effects)
    }

    #[allow(clippy::unused_self)]
    fn add_customer_note(
        &self,
        state: &mut DemoState,
        content: &str,
        env: &OrderEnvironment,
    ) -> Result<Effects, OrderError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(OrderError::EmptyNote);
        }

        let note = CustomerNote {
            id: NoteId::new(env.ids.next_id("note")),
            content: content.to_string(),
            created_at: env.clock.now(),
        };
        tracing::info!(note_id = %note.id, "Customer note added");

        state.customer.notes.insert(0, note);
        Ok(smallvec![Effect::Notify(Notification::success(
            "Note added",
            format!("Saved to {}'s record", state.customer.name),
        ))])
    }

    fn low_stock_warning(&self, product: &Product) -> Option<Effect<OrderAction>> {
        (product.stock <= self.policy.low_stock_threshold).then(|| {
            Effect::Notify(Notification::warning(
                "Low stock",
                format!("{} has {} units left", product.name, product.stock),
            ))
        })
    }
}

impl Reducer for OrderReducer {
    type State = DemoState;
    type Action = OrderAction;
    type Environment = OrderEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let name = action.name();
        state.last_error = None;

        let result = match action {
            OrderAction::CreateOrder {
                product_id,
                quantity,
            } => self.create_order(state, &product_id, quantity, env),
            OrderAction::ConfirmOrder { order_id } => {
                self.transition(state, &order_id, Target::Exact(OrderStatus::Confirmed), env)
            },
            OrderAction::BeginFulfillment { order_id } => {
                self.transition(state, &order_id, Target::Exact(OrderStatus::Processing), env)
            },
            OrderAction::ShipOrder { order_id } => {
                self.transition(state, &order_id, Target::Exact(OrderStatus::Shipped), env)
            },
            OrderAction::AdvanceOrder { order_id } => {
                self.transition(state, &order_id, Target::Next, env)
            },
            OrderAction::AdjustStock { product_id, delta } => {
                self.adjust_stock(state, &product_id, delta)
            },
            OrderAction::AddCustomerNote { content } => {
                self.add_customer_note(state, &content, env)
            },
            OrderAction::ResetSession => {
                *state = DemoState::seeded();
                tracing::info!("Session reset to seed data");
                Ok(smallvec![Effect::Notify(Notification::info(
                    "Demo reset",
                    "Catalog, orders and notes restored",
                ))])
            },
        };

        match result {
            Ok(effects) => effects,
            Err(error) => {
                tracing::warn!(command = name, %error, "Command rejected");
                metrics::counter!("orders.rejected", "reason" => error.reason()).increment(1);
                let notification = Notification::error(error.title(), error.to_string());
                state.last_error = Some(error);
                smallvec![Effect::Notify(notification)]
            },
        }
    }
}
