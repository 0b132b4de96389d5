//! View models for the five demo sections.
//!
//! Every view is a pure function of a [`DemoState`] snapshot, the viewer's
//! [`Role`] and local input. Sections never touch the state directly: drafts
//! submit through the [`OrderEngine`] and views are rebuilt from the next
//! snapshot. The highlighted order and the active section live in
//! [`ViewState`] and carry no business meaning.

use crate::analytics::OrderAnalytics;
use crate::engine::OrderEngine;
use crate::error::OrderError;
use crate::types::{
    Customer, CustomerNote, DemoState, Order, OrderId, OrderStatus, Product, ProductId, Role,
};
use serde::Serialize;
use std::fmt;

/// Orders listed in the order processing section
pub const RECENT_ORDER_LIMIT: usize = 5;

/// Navigation targets, in page order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Order entry
    #[default]
    OrderProcessing,
    /// Stock levels
    Inventory,
    /// Status lanes
    Fulfillment,
    /// Customer record and notes
    Customer,
    /// Sales figures
    Analytics,
}

impl Section {
    /// Every section in navigation order
    pub const ALL: [Self; 5] = [
        Self::OrderProcessing,
        Self::Inventory,
        Self::Fulfillment,
        Self::Customer,
        Self::Analytics,
    ];

    /// Heading shown in the navigation bar
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::OrderProcessing => "Order Processing",
            Self::Inventory => "Inventory",
            Self::Fulfillment => "Fulfillment",
            Self::Customer => "Customer",
            Self::Analytics => "Analytics",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Presentation-only pointers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Who is looking
    pub role: Role,
    /// Section scrolled into view
    pub active_section: Section,
    /// Order drawn with emphasis, usually the newest one
    pub highlighted_order: Option<OrderId>,
}

impl ViewState {
    /// A view for `role` starting at the first section
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Emphasise an order
    pub fn highlight(&mut self, order_id: OrderId) {
        self.highlighted_order = Some(order_id);
    }

    /// Jump to a section
    pub fn navigate(&mut self, section: Section) {
        tracing::debug!(from = %self.active_section, to = %section, "Navigating");
        self.active_section = section;
    }

    /// Drop the highlight when its order no longer exists (after a reset)
    pub fn clear_highlight_if_missing(&mut self, state: &DemoState) {
        if let Some(id) = &self.highlighted_order {
            if state.order(id).is_none() {
                self.highlighted_order = None;
            }
        }
    }

    /// Whether `order_id` is the highlighted order
    #[must_use]
    pub fn is_highlighted(&self, order_id: &OrderId) -> bool {
        self.highlighted_order.as_ref() == Some(order_id)
    }
}

/// Order entry form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Selected product
    pub product_id: Option<ProductId>,
    /// Units, starts at one
    pub quantity: u32,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            product_id: None,
            quantity: 1,
        }
    }
}

impl OrderDraft {
    /// A draft for `quantity` units of `product_id`
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
        }
    }

    /// Create the order and highlight it.
    ///
    /// The draft is reset to its defaults on success.
    ///
    /// # Errors
    ///
    /// [`OrderError::NoProductSelected`] without reaching the engine when
    /// nothing is selected, otherwise whatever [`OrderEngine::create_order`]
    /// reports.
    pub fn submit(
        &mut self,
        engine: &OrderEngine,
        view: &mut ViewState,
    ) -> Result<Order, OrderError> {
        let product_id = self
            .product_id
            .clone()
            .ok_or(OrderError::NoProductSelected)?;
        let order = engine.create_order(&product_id, self.quantity)?;
        view.highlight(order.id.clone());
        *self = Self::default();
        Ok(order)
    }
}

/// Note entry form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    /// Text typed so far
    pub content: String,
}

impl NoteDraft {
    /// A draft holding `content`
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Whether there is anything to save
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Save the note and clear the draft.
    ///
    /// A blank draft is rejected here without reaching the engine.
    ///
    /// # Errors
    ///
    /// [`OrderError::EmptyNote`].
    pub fn submit(&mut self, engine: &OrderEngine) -> Result<CustomerNote, OrderError> {
        if self.is_blank() {
            return Err(OrderError::EmptyNote);
        }
        let note = engine.add_customer_note(&self.content)?;
        self.content.clear();
        Ok(note)
    }
}

/// One row in a list of orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    /// The order
    pub order: Order,
    /// Drawn with emphasis
    pub highlighted: bool,
}

fn rows(orders: Vec<Order>, view: &ViewState) -> Vec<OrderRow> {
    orders
        .into_iter()
        .map(|order| OrderRow {
            highlighted: view.is_highlighted(&order.id),
            order,
        })
        .collect()
}

/// Order entry panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderProcessingView {
    /// Products with at least one unit in stock
    pub orderable: Vec<Product>,
    /// Newest orders first, at most [`RECENT_ORDER_LIMIT`]
    pub recent_orders: Vec<OrderRow>,
}

impl OrderProcessingView {
    /// Build the panel for the current snapshot
    #[must_use]
    pub fn build(state: &DemoState, view: &ViewState) -> Self {
        let mut orders = state.orders_for_role(view.role);
        orders.truncate(RECENT_ORDER_LIMIT);
        Self {
            orderable: state.catalog.iter().filter(|p| p.in_stock()).cloned().collect(),
            recent_orders: rows(orders, view),
        }
    }
}

/// One product in the inventory table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    /// The product
    pub product: Product,
    /// At or below the low-stock threshold
    pub low_stock: bool,
    /// Units sitting in orders not yet shipped
    pub committed: u64,
}

/// Inventory table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryView {
    /// One row per catalog product
    pub rows: Vec<InventoryRow>,
    /// Stock adjustment controls are shown
    pub can_adjust: bool,
}

impl InventoryView {
    /// Build the table for the current snapshot
    #[must_use]
    pub fn build(state: &DemoState, role: Role, low_stock_threshold: i64) -> Self {
        let rows = state
            .catalog
            .iter()
            .map(|product| InventoryRow {
                low_stock: product.stock <= low_stock_threshold,
                committed: state
                    .orders
                    .iter()
                    .filter(|o| o.product.id == product.id && !o.status.is_terminal())
                    .map(|o| u64::from(o.quantity))
                    .sum(),
                product: product.clone(),
            })
            .collect();
        Self {
            rows,
            can_adjust: role == Role::Admin,
        }
    }
}

/// Button offered on a fulfillment card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentAction {
    /// Calls [`OrderEngine::confirm_order`]
    Confirm,
    /// Calls [`OrderEngine::begin_fulfillment`]
    BeginFulfillment,
    /// Calls [`OrderEngine::ship_order`]
    Ship,
}

impl FulfillmentAction {
    /// The button for orders in `status`, `None` once shipped
    #[must_use]
    pub const fn for_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Pending => Some(Self::Confirm),
            OrderStatus::Confirmed => Some(Self::BeginFulfillment),
            OrderStatus::Processing => Some(Self::Ship),
            OrderStatus::Shipped => None,
        }
    }

    /// Run the action against the engine.
    ///
    /// # Errors
    ///
    /// Whatever the corresponding engine operation reports.
    pub fn apply(
        self,
        engine: &OrderEngine,
        order_id: &OrderId,
    ) -> Result<Option<Order>, OrderError> {
        match self {
            Self::Confirm => engine.confirm_order(order_id),
            Self::BeginFulfillment => engine.begin_fulfillment(order_id),
            Self::Ship => engine.ship_order(order_id),
        }
    }
}

/// One status column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentLane {
    /// Column status
    pub status: OrderStatus,
    /// Button on every card in the column
    pub action: Option<FulfillmentAction>,
    /// Orders in the column, newest first
    pub orders: Vec<OrderRow>,
}

/// Kanban-style board of orders by status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentView {
    /// One lane per status in lifecycle order
    pub lanes: Vec<FulfillmentLane>,
}

impl FulfillmentView {
    /// Build the board for the current snapshot
    #[must_use]
    pub fn build(state: &DemoState, view: &ViewState) -> Self {
        let lanes = OrderStatus::ALL
            .iter()
            .map(|&status| FulfillmentLane {
                status,
                action: FulfillmentAction::for_status(status),
                orders: rows(state.orders_by_status(status), view),
            })
            .collect();
        Self { lanes }
    }

    /// The lane for `status`
    #[must_use]
    pub fn lane(&self, status: OrderStatus) -> Option<&FulfillmentLane> {
        self.lanes.iter().find(|l| l.status == status)
    }
}

/// Customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerView {
    /// Contact details and notes, newest first
    pub customer: Customer,
    /// Orders placed by this customer
    pub order_count: usize,
}

impl CustomerView {
    /// Build the record for the current snapshot
    #[must_use]
    pub fn build(state: &DemoState) -> Self {
        Self {
            customer: state.customer.clone(),
            order_count: state
                .orders
                .iter()
                .filter(|o| o.customer_id == state.customer.id)
                .count(),
        }
    }
}

/// Analytics dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsView {
    /// Figures behind the charts
    pub analytics: OrderAnalytics,
}

impl AnalyticsView {
    /// Build the dashboard for the current snapshot
    #[must_use]
    pub fn build(state: &DemoState, low_stock_threshold: i64) -> Self {
        Self {
            analytics: OrderAnalytics::from_state(state, low_stock_threshold),
        }
    }
}
