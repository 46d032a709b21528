use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use colored::Colorize;
use stall_application::build_order_repository;
use stall_core::config::StallConfig;
use stall_core::order::OrderFilter;

pub async fn list(
    config: &StallConfig,
    date: Option<NaiveDate>,
    status: Option<String>,
    limit: usize,
    offset: usize,
) -> Result<()> {
    let repository = build_order_repository(config)
        .await
        .context("Failed to open the order store")?;
    let filter = OrderFilter {
        date,
        status,
        limit,
        offset,
    };
    let orders = repository.list(&filter).await?;

    if orders.is_empty() {
        println!("{}", "No orders found.".bright_black());
        return Ok(());
    }
    for order in orders {
        let payload = &order.payload;
        println!(
            "{}  {}  {:>5}元  {} item(s)  [{}]",
            payload.order_id.bright_cyan(),
            payload.created_at.format("%Y-%m-%d %H:%M:%S"),
            payload.total_price,
            payload.items.len(),
            payload.status
        );
    }
    Ok(())
}

pub async fn show(config: &StallConfig, order_id: &str) -> Result<()> {
    let repository = build_order_repository(config)
        .await
        .context("Failed to open the order store")?;
    let Some(order) = repository.get(order_id).await? else {
        bail!("Order {} not found", order_id);
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&order).context("Failed to serialize the order")?
    );
    Ok(())
}
