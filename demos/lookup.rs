//! IP Lookup Example
//!
//! Demonstrates single and bulk geolocation lookups against the ipstack API.
//! The access key is read from `IPSTACK_ACCESS_KEY` or the config file.
//!
//! # Running
//!
//! ```bash
//! IPSTACK_ACCESS_KEY=... cargo run --example lookup --no-default-features
//! ```

use ipstack::{IpstackConfig, LookupClient, OutputFormat};

fn main() -> anyhow::Result<()> {
    let config = IpstackConfig::new(&None)?;
    let client = LookupClient::from_config(&config)?;

    // Look up a single IP
    let result = client.check("134.201.250.155")?;
    println!("IP: {}", result.ip.as_deref().unwrap_or("-"));
    if let Some(country) = &result.country_name {
        println!("Country: {}", country);
    }
    if let Some(city) = &result.city {
        println!("City: {}", city);
    }
    if let Some(connection) = &result.connection {
        println!("\nNetwork Information:");
        if let Some(asn) = connection.asn {
            println!("  ASN: {}", asn);
        }
        if let Some(isp) = &connection.isp {
            println!("  ISP: {}", isp);
        }
    }

    // Several IPs in one request
    let results = client.check_bulk(&["1.1.1.1", "8.8.8.8"])?;
    println!(
        "\n{}",
        client.format_result(&results, &OutputFormat::Table)
    );

    Ok(())
}
