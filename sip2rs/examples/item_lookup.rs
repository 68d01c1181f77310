//! Look up items by barcode without logging in a patron
//!
//! ```text
//! SIP2_HOST=acs.local cargo run --example item_lookup -- 31234000123456 31234000654321
//! ```

use sip2rs::{Client, ProtocolConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = std::env::var("SIP2_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let institution = std::env::var("SIP2_INSTITUTION").unwrap_or_default();

    // Some servers do not implement checksums
    let checksum = std::env::var("SIP2_NO_CHECKSUM").is_err();

    let config = ProtocolConfig::new(host, 6001)
        .with_institution(institution)
        .with_checksum(checksum);

    let mut client = Client::new(config);
    client.connect().await?;

    for barcode in std::env::args().skip(1) {
        let item = client.item_information(&barcode).await?;
        println!(
            "{}: {} [status {}] due {}",
            barcode,
            item.field("AJ").unwrap_or("(no title)"),
            item.text("CirculationStatus").unwrap_or("??"),
            item.field("AH").unwrap_or("-"),
        );
        for message in item.fields("AF") {
            println!("  {}", message);
        }
    }

    client.disconnect().await?;
    Ok(())
}
