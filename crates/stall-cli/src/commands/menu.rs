use anyhow::{Context, Result};
use colored::Colorize;
use stall_application::bootstrap::build_menu;
use stall_core::config::StallConfig;

pub fn run(config: &StallConfig) -> Result<()> {
    let menu = build_menu(config);
    let items = menu.get_all_items().context("Failed to load the menu")?;

    let mut categories: Vec<&str> = Vec::new();
    for item in items.iter() {
        if !categories.contains(&item.category.as_str()) {
            categories.push(&item.category);
        }
    }

    for category in categories {
        println!("{}", format!("【{}】", category).bright_magenta().bold());
        for item in items.iter().filter(|item| item.category == category) {
            println!("  {:<20} {:>4}元", item.name, item.price);
        }
    }
    Ok(())
}
