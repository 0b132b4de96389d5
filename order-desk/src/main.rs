//! Order desk demo.
//!
//! Walks through a salesperson and back-office session against a fresh
//! engine, then prints the final snapshot and analytics as JSON.

use order_desk::sections::{
    FulfillmentAction, FulfillmentView, InventoryView, NoteDraft, OrderDraft, OrderProcessingView,
    Section, ViewState,
};
use order_desk::{DemoConfig, OrderEngine, OrderError, OrderStatus, ProductId, Role};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();
    let config = DemoConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(?config, "Configuration loaded");

    let engine = OrderEngine::new(config);
    let mut sales = ViewState::new(Role::Salesperson);
    let mut admin = ViewState::new(Role::Admin);

    // Order entry
    let mut draft = OrderDraft::new(ProductId::new("prod-002"), 3);
    let order = draft.submit(&engine, &mut sales)?;
    info!(order_id = %order.id, total = %order.total, "Salesperson placed an order");

    let panel = OrderProcessingView::build(&engine.snapshot(), &sales);
    info!(
        orderable = panel.orderable.len(),
        recent = panel.recent_orders.len(),
        "Order processing panel"
    );

    // Overselling is refused and leaves stock alone
    match engine.create_order(&ProductId::new("prod-002"), 10) {
        Err(error @ OrderError::InsufficientStock { .. }) => warn!(%error, "Order refused"),
        other => anyhow::bail!("expected an insufficient stock error, got {other:?}"),
    }

    // Back office moves the order through fulfillment
    admin.navigate(Section::Fulfillment);
    loop {
        let board = FulfillmentView::build(&engine.snapshot(), &admin);
        let next = board
            .lanes
            .iter()
            .find(|lane| lane.orders.iter().any(|row| row.order.id == order.id))
            .and_then(|lane| lane.action);
        let Some(action) = next else { break };
        action.apply(&engine, &order.id)?;
    }
    let shipped = engine.orders_by_status(OrderStatus::Shipped);
    info!(shipped = shipped.len(), "Fulfillment board cleared");

    // Shipping twice is rejected
    if let Err(error) = FulfillmentAction::Ship.apply(&engine, &order.id) {
        warn!(%error, "Second shipment refused");
    }

    // Restock what was sold
    admin.navigate(Section::Inventory);
    let restocked = engine.adjust_stock(&ProductId::new("prod-002"), 3)?;
    info!(product = %restocked.name, stock = restocked.stock, "Restocked");
    let inventory = InventoryView::build(
        &engine.snapshot(),
        admin.role,
        engine.config().low_stock_threshold,
    );
    let low: Vec<_> = inventory
        .rows
        .iter()
        .filter(|row| row.low_stock)
        .map(|row| row.product.name.as_str())
        .collect();
    info!(?low, "Inventory reviewed");

    // Customer notes
    sales.navigate(Section::Customer);
    let mut note = NoteDraft::new("Prefers delivery before noon");
    note.submit(&engine)?;
    if let Err(error) = NoteDraft::new("   ").submit(&engine) {
        warn!(%error, "Blank note discarded");
    }

    sales.navigate(Section::Analytics);
    for toast in engine.toasts().drain() {
        println!("{toast}");
    }

    println!("{}", serde_json::to_string_pretty(&*engine.snapshot())?);
    println!("{}", serde_json::to_string_pretty(&engine.analytics())?);

    Ok(())
}
