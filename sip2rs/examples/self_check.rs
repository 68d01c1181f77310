//! Self-check session: login, status, patron lookup, checkout and checkin
//!
//! ```text
//! SIP2_HOST=acs.local SIP2_USER=sc01 SIP2_PASSWORD=secret \
//! SIP2_PATRON=P0001 SIP2_PATRON_PASSWORD=1234 SIP2_ITEM=31234000123456 \
//! RUST_LOG=debug cargo run --example self_check
//! ```

use std::env;
use std::time::Duration;

use anyhow::Context;
use sip2rs::{Client, ProtocolConfig, SummaryType};
use tracing_subscriber::EnvFilter;

fn var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = var("SIP2_HOST", "127.0.0.1");
    let port = var("SIP2_PORT", "6001").parse().context("SIP2_PORT must be a port number")?;

    let config = ProtocolConfig::new(host, port)
        .with_institution(var("SIP2_INSTITUTION", ""))
        .with_location(var("SIP2_LOCATION", ""))
        .with_terminal_password(var("SIP2_TERMINAL_PASSWORD", ""))
        .with_patron(var("SIP2_PATRON", ""), var("SIP2_PATRON_PASSWORD", ""))
        .with_read_timeout(Duration::from_secs(10));

    let mut client = Client::new(config);
    client.connect().await?;
    println!("Connected to {}", client.config().address());

    let login = client
        .login(&var("SIP2_USER", ""), &var("SIP2_PASSWORD", ""))
        .await?;
    println!("Login ok: {}", login.text("Ok").unwrap_or("?"));

    let status = client.sc_status().await?;
    println!(
        "ACS online: {}, checkout allowed: {}, protocol {}",
        status.text("Online").unwrap_or("?"),
        status.text("Checkout").unwrap_or("?"),
        status.text("Protocol").unwrap_or("?"),
    );

    let patron = client.patron_information(SummaryType::Charged).await?;
    println!("Patron: {}", patron.field("AE").unwrap_or("(unknown)"));
    println!("Valid: {}", patron.field("BL").unwrap_or("?"));
    println!("Items charged: {}", patron.count("ChargedCount").unwrap_or(0));
    for item in patron.fields("AU") {
        println!("  {}", item);
    }

    if let Ok(item) = env::var("SIP2_ITEM") {
        let checkout = client.checkout(&item).await?;
        println!(
            "Checkout {}: ok={} due={}",
            item,
            checkout.text("Ok").unwrap_or("?"),
            checkout.field("AH").unwrap_or("-"),
        );

        let checkin = client.checkin(&item, &var("SIP2_LOCATION", "")).await?;
        println!("Checkin {}: ok={}", item, checkin.text("Ok").unwrap_or("?"));
    }

    client.end_patron_session().await?;
    client.disconnect().await?;
    println!("Disconnected");

    Ok(())
}
