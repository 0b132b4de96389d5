//! Core domain types for the order desk.
//!
//! Orders progress through a strictly forward lifecycle:
//! Pending → Confirmed → Processing → Shipped

use crate::error::OrderError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the inner string value
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a catalog product
    ProductId
);
string_id!(
    /// Unique identifier for an order
    OrderId
);
string_id!(
    /// Unique identifier for the customer
    CustomerId
);
string_id!(
    /// Unique identifier for a customer note
    NoteId
);

/// Money amount in cents (to avoid floating point issues)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a new money amount from cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new money amount from whole dollars
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Returns the value in cents
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Multiplies a unit price by a quantity
    #[must_use]
    pub fn times(self, quantity: u64) -> Self {
        let quantity = i64::try_from(quantity).unwrap_or(i64::MAX);
        Self(self.0.saturating_mul(quantity))
    }

    /// Sum of amounts, saturating at the bounds
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

/// A catalog product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Units available; only negative in backorder mode
    pub stock: i64,
}

impl Product {
    /// Creates a new product
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money, stock: i64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            stock,
        }
    }

    /// Checks if at least one unit can be ordered
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Status of an order in its lifecycle
///
/// Variants are declared in lifecycle order, so `Ord` follows the flow.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by sales
    Confirmed,
    /// Being picked and packed
    Processing,
    /// Handed to the carrier
    Shipped,
}

impl OrderStatus {
    /// Every status in lifecycle order
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
    ];

    /// The following stage, `None` once shipped
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => None,
        }
    }

    /// Checks if moving to `target` goes forward in the lifecycle
    ///
    /// Skipping stages is allowed; staying put or going back is not.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        target > self
    }

    /// Checks if the order has left the warehouse
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Shipped)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
        }
    }
}

/// An order for a single product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Customer who placed the order
    pub customer_id: CustomerId,
    /// Copy of the product as it was when the order was created
    pub product: Product,
    /// Units ordered (at least 1)
    pub quantity: u32,
    /// `product.price * quantity`, fixed at creation
    pub total: Money,
    /// Current lifecycle stage
    pub status: OrderStatus,
    /// When the order was created
    pub created_at: DateTime<Utc>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

/// A free-text note about the customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerNote {
    /// Note identifier
    pub id: NoteId,
    /// Note text, never blank
    pub content: String,
    /// When the note was written
    pub created_at: DateTime<Utc>,
}

/// The demo's single customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier
    pub id: CustomerId,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Notes, newest first
    pub notes: Vec<CustomerNote>,
}

/// Who is looking at the demo
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sales staff: order entry and customer notes
    #[default]
    Salesperson,
    /// Back office: inventory and fulfillment
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Salesperson => write!(f, "salesperson"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The whole demo state: catalog, orders and customer
///
/// Every processed action publishes a fresh copy of this value as an
/// immutable snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    /// Products, in catalog order
    pub catalog: Vec<Product>,
    /// Orders, newest first
    pub orders: Vec<Order>,
    /// The customer
    pub customer: Customer,
    /// Why the most recent command was rejected, `None` if it was applied
    pub last_error: Option<OrderError>,
}

impl DemoState {
    /// Creates a state with the given catalog and customer and no orders
    #[must_use]
    pub const fn new(catalog: Vec<Product>, customer: Customer) -> Self {
        Self {
            catalog,
            orders: Vec::new(),
            customer,
            last_error: None,
        }
    }

    /// Looks up a product
    #[must_use]
    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| &p.id == product_id)
    }

    /// Looks up a product for mutation
    pub fn product_mut(&mut self, product_id: &ProductId) -> Option<&mut Product> {
        self.catalog.iter_mut().find(|p| &p.id == product_id)
    }

    /// Looks up an order
    #[must_use]
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == order_id)
    }

    /// Looks up an order for mutation
    pub fn order_mut(&mut self, order_id: &OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| &o.id == order_id)
    }

    /// Orders with exactly this status, newest first
    #[must_use]
    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    /// Orders visible to a role
    ///
    /// Both roles currently see every order; there is no per-role filtering.
    #[must_use]
    pub fn orders_for_role(&self, _role: Role) -> Vec<Order> {
        self.orders.clone()
    }
}

/// Commands accepted by the order reducer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    /// Create a pending order, taking the units out of stock
    CreateOrder {
        /// Product to order
        product_id: ProductId,
        /// Units to order
        quantity: u32,
    },

    /// Move an order to `confirmed`
    ConfirmOrder {
        /// Order to confirm
        order_id: OrderId,
    },

    /// Move an order to `processing`
    BeginFulfillment {
        /// Order to fulfil
        order_id: OrderId,
    },

    /// Move an order to `shipped`
    ShipOrder {
        /// Order to ship
        order_id: OrderId,
    },

    /// Move an order to the next stage of its lifecycle
    AdvanceOrder {
        /// Order to advance
        order_id: OrderId,
    },

    /// Receive (positive) or remove (negative) stock
    AdjustStock {
        /// Product to adjust
        product_id: ProductId,
        /// Signed change in units
        delta: i64,
    },

    /// Prepend a note to the customer record
    AddCustomerNote {
        /// Note text
        content: String,
    },

    /// Discard every change and restore the seeded state
    ResetSession,
}

impl OrderAction {
    /// Short name used in logs and metrics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateOrder { .. } => "create_order",
            Self::ConfirmOrder { .. } => "confirm_order",
            Self::BeginFulfillment { .. } => "begin_fulfillment",
            Self::ShipOrder { .. } => "ship_order",
            Self::AdvanceOrder { .. } => "advance_order",
            Self::AdjustStock { .. } => "adjust_stock",
            Self::AddCustomerNote { .. } => "add_customer_note",
            Self::ResetSession => "reset_session",
        }
    }
}
