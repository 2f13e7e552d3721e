//! Coupon list page driven from the terminal
//!
//! Run with `RUST_LOG=listkit=debug cargo run --example coupons` to see the
//! pipeline decisions.

use listkit::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn seed() -> Vec<Value> {
    let codes = [
        ("SPRING10", "YUZDE", 10, true),
        ("WELCOME50", "SABIT", 50, true),
        ("SUMMER15", "YUZDE", 15, true),
        ("OLD5", "YUZDE", 5, false),
        ("FREESHIP", "SABIT", 30, true),
        ("VIP20", "YUZDE", 20, true),
        ("BLACKFRIDAY", "YUZDE", 40, false),
        ("LOYAL100", "SABIT", 100, false),
        ("STUDENT12", "YUZDE", 12, true),
        ("NEWYEAR25", "SABIT", 25, true),
    ];

    codes
        .iter()
        .enumerate()
        .map(|(i, (code, kind, value, active))| {
            json!({
                "id": format!("c{}", i + 1),
                "code": code,
                "type": kind,
                "value": value,
                "active": active,
                "usageCount": i * 3,
                "createdAt": format!("2024-03-{:02}T10:00:00Z", i + 1),
            })
        })
        .collect()
}

fn print_view(controller: &ListController<Value, InMemoryDataSource<Value>>) {
    let view = controller.view();
    println!(
        "  page {}/{} | {} of {} coupons",
        view.page(),
        view.total_pages(),
        view.total_matched,
        view.total_unfiltered
    );
    for coupon in &view.records {
        println!(
            "    {:<12} {:<6} {:>4}  active={}",
            coupon["code"].as_str().unwrap_or("-"),
            coupon["type"].as_str().unwrap_or("-"),
            coupon["value"],
            coupon["active"]
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("listkit=info")),
        )
        .init();

    let config = ConsoleConfig::default_config();
    let source = InMemoryDataSource::with_records(seed()).generating_ids();
    let mut controller = ListController::from_config(
        &config,
        "coupons",
        source,
        Arc::new(AutoConfirm::accept()),
        Arc::new(TracingNotifier),
    )?;

    controller.load().await?;
    println!("All coupons, newest first:");
    print_view(&controller);

    println!("\nStats:");
    for (name, value) in controller.stats().iter() {
        println!("  {name}: {value:?}");
    }

    // Typed search goes through the debouncer before it reaches the query
    let debouncer = Debouncer::new(config.search_debounce());
    if let Some(text) = debouncer.settle("year").await {
        controller.set_search(text);
    }
    println!("\nSearch \"year\":");
    print_view(&controller);

    controller.set_search("");
    controller.set_filter("active", Filter::Equals(true.into()));
    controller.set_filter("type", Filter::Equals("YUZDE".into()));
    controller.toggle_sort("value");
    println!("\nActive percentage coupons by value:");
    print_view(&controller);

    controller
        .create(json!({
            "code": "AUTUMN30",
            "type": "YUZDE",
            "value": 30,
            "active": true,
            "createdAt": "2024-09-01T09:00:00Z",
        }))
        .await?;
    println!("\nAfter creating AUTUMN30:");
    print_view(&controller);

    if let DeleteOutcome::Failed(e) = controller.delete("c1", "SPRING10").await {
        println!("delete failed: {e}");
    }

    println!("\nCSV export of the current view:");
    print!("{}", controller.export_csv()?);

    Ok(())
}
