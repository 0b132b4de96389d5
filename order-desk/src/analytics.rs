//! Read-only sales and inventory figures derived from a snapshot.

use crate::types::{DemoState, Money, OrderStatus, ProductId};
use serde::{Deserialize, Serialize};

/// Number of orders in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status
    pub status: OrderStatus,
    /// Orders currently in it
    pub count: usize,
}

/// Units and revenue for one catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    /// Product
    pub product_id: ProductId,
    /// Current catalog name
    pub name: String,
    /// Units ordered across all orders
    pub units: u64,
    /// Sum of order totals
    pub revenue: Money,
}

/// Figures shown by the analytics section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAnalytics {
    /// Orders ever created this session
    pub total_orders: usize,
    /// Sum of every order total
    pub total_revenue: Money,
    /// Mean order total, zero without orders
    pub average_order_value: Money,
    /// Orders per status, in lifecycle order
    pub by_status: Vec<StatusCount>,
    /// Sales per product, in catalog order
    pub product_sales: Vec<ProductSales>,
    /// Value of stock on hand at current prices
    pub inventory_value: Money,
    /// Products at or under the low-stock threshold
    pub low_stock: Vec<ProductId>,
    /// Share of orders already shipped, 0-100
    pub fulfillment_rate_percent: u8,
}

impl OrderAnalytics {
    /// Compute every figure from one snapshot
    #[must_use]
    pub fn from_state(state: &DemoState, low_stock_threshold: i64) -> Self {
        let total_orders = state.orders.len();
        let total_revenue: Money = state.orders.iter().map(|o| o.total).sum();

        let average_order_value = i64::try_from(total_orders)
            .ok()
            .filter(|n| *n > 0)
            .map_or(Money::ZERO, |n| Money::from_cents(total_revenue.cents() / n));

        let by_status: Vec<StatusCount> = OrderStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: state.orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let product_sales: Vec<ProductSales> = state
            .catalog
            .iter()
            .map(|product| {
                let orders = state.orders.iter().filter(|o| o.product.id == product.id);
                let (units, revenue) = orders.fold((0u64, Money::ZERO), |(units, revenue), o| {
                    (units + u64::from(o.quantity), revenue.saturating_add(o.total))
                });
                ProductSales {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    units,
                    revenue,
                }
            })
            .collect();

        let inventory_value: Money = state
            .catalog
            .iter()
            .map(|p| p.price.times(p.stock.max(0).unsigned_abs()))
            .sum();

        let low_stock: Vec<ProductId> = state
            .catalog
            .iter()
            .filter(|p| p.stock <= low_stock_threshold)
            .map(|p| p.id.clone())
            .collect();

        let shipped = state
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Shipped)
            .count();
        let fulfillment_rate_percent = if total_orders == 0 {
            0
        } else {
            u8::try_from(shipped * 100 / total_orders).unwrap_or(100)
        };

        Self {
            total_orders,
            total_revenue,
            average_order_value,
            by_status,
            product_sales,
            inventory_value,
            low_stock,
            fulfillment_rate_percent,
        }
    }

    /// Orders currently in `status`
    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> usize {
        self.by_status
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }

    /// Best-selling product by revenue, `None` before the first order
    #[must_use]
    pub fn top_product(&self) -> Option<&ProductSales> {
        self.product_sales
            .iter()
            .filter(|p| p.units > 0)
            .max_by_key(|p| p.revenue)
    }
}
