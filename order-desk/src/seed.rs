//! Seed data loaded at the start of every session.

use crate::types::{Customer, CustomerId, DemoState, Money, Product};

/// Id of the demo's only customer
pub const CUSTOMER_ID: &str = "cust-001";

/// The fixed four-product catalog
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    vec![
        Product::new("prod-001", "Alpha Unit", Money::from_cents(29_999), 10),
        Product::new("prod-002", "Beta Package", Money::from_cents(49_999), 5),
        Product::new("prod-003", "Gamma Bundle", Money::from_cents(14_999), 25),
        Product::new("prod-004", "Delta Suite", Money::from_cents(99_999), 3),
    ]
}

/// The synthetic customer, without notes
#[must_use]
pub fn seed_customer() -> Customer {
    Customer {
        id: CustomerId::new(CUSTOMER_ID),
        name: "Jordan Avery".to_string(),
        email: "jordan.avery@example.com".to_string(),
        phone: "+1-555-0142".to_string(),
        notes: Vec::new(),
    }
}

impl DemoState {
    /// Seeded catalog, seeded customer, no orders
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_catalog(), seed_customer())
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::seeded()
    }
}
