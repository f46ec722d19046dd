//! gRPC client demo
//!
//! Lists the menu, orders two rounds of every drink and prints the bill.
//!
//! Without `ORDERSYSTEM_GRPC_URL` the demo serves an in-memory order service
//! in-process and talks to it:
//!
//! ```sh
//! cargo run --features grpc --example grpc_client
//! ```
//!
//! To target a running server instead:
//!
//! ```sh
//! cargo run --features grpc
//! ORDERSYSTEM_GRPC_URL=http://127.0.0.1:3000 cargo run --features grpc --example grpc_client
//! ```

use anyhow::Result;
use ordersystem::prelude::*;
use ordersystem::server::exposure::grpc::proto::{
    Drink, OrderItem, OrderRequest, order_service_client::OrderServiceClient,
};
use std::collections::BTreeMap;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let url = match std::env::var("ORDERSYSTEM_GRPC_URL") {
        Ok(url) => url,
        Err(_) => spawn_local_server().await?,
    };
    tracing::info!(%url, "connecting");
    let mut client = OrderServiceClient::connect(url).await?;

    println!("Requesting drinks 🍹🍺☕");
    let drinks = client.get_drinks(()).await?.into_inner().drinks;
    println!("Available drinks:");
    for d in &drinks {
        println!(
            "\t> id:{}  name:{:?}  price:{}  description:{:?}",
            d.id, d.name, d.price, d.description
        );
    }

    for (label, quantity) in [("Ordering drinks", 2), ("Ordering another round of drinks", 6)] {
        println!("{} 👨‍🍳⏱️🍻🍻", label);
        for d in &drinks {
            let item = OrderItem {
                drink_id: i64::try_from(d.id)?,
                quantity,
            };
            client
                .order_drink(OrderRequest { item: Some(item) })
                .await?;
            println!("\t> Ordering: {} x {}", quantity, drink_name(d.id, &drinks));
        }
    }

    println!("Getting the bill 💹💹💹");
    let orders = client.get_orders(()).await?.into_inner().orders;
    let mut bill: BTreeMap<u64, u64> = BTreeMap::new();
    for o in &orders {
        *bill.entry(o.drink_id).or_insert(0) += o.quantity;
    }
    for (id, quantity) in &bill {
        println!("\t> Total: {} x {}", quantity, drink_name(*id, &drinks));
    }

    // Cross-check against the server-side aggregate
    let server_totals = client.get_totals(()).await?.into_inner().totals;
    let server_bill: BTreeMap<u64, u64> = server_totals
        .iter()
        .map(|t| (t.drink_id, t.quantity))
        .collect();
    if server_bill != bill {
        tracing::warn!("server totals differ from the client-side bill");
    }

    println!("Orders complete!");
    Ok(())
}

/// Serve REST and gRPC over an in-memory store on an ephemeral port
async fn spawn_local_server() -> Result<String> {
    let app = ServerBuilder::new()
        .with_store(InMemoryStore::new())
        .build()?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("demo server stopped: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}

fn drink_name(id: u64, drinks: &[Drink]) -> &str {
    drinks
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.as_str())
        .unwrap_or("Unknown")
}
