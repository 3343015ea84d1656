#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipstack - A typed client for the ipstack IP geolocation API
//!
//! The crate turns one or more IP address strings into structured
//! geolocation records by calling the ipstack HTTP API and decoding its JSON
//! answer. It can be used as a library or through the `ipstack` command line
//! tool.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Lookup client, configuration, output formatting | `ureq`, `serde`, `config` |
//! | `cli` | Command line binary | `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Library only
//! ipstack = { version = "0.1", default-features = false }
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: lookups and result formatting
//!   - `lookup`: [`LookupClient`], its transport, result and error types
//!   - `utils`: [`OutputFormat`]
//! - **[`config`]**: Configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ipstack::{LookupClient, DEFAULT_CLIENT_TIMEOUT};
//!
//! let client = LookupClient::new("my-access-key", false, DEFAULT_CLIENT_TIMEOUT);
//!
//! // One address, one record
//! let result = client.check("134.201.250.155")?;
//!
//! // Several addresses in a single request
//! let results = client.check_bulk(&["1.1.1.1", "8.8.8.8"])?;
//! for r in &results {
//!     println!("{:?} -> {:?}", r.ip, r.country_name);
//! }
//! ```
//!
//! ## From configuration
//!
//! ```rust,ignore
//! use ipstack::{IpstackConfig, LookupClient};
//!
//! // reads ~/.ipstack/ipstack.toml and IPSTACK_* environment variables
//! let config = IpstackConfig::new(&None)?;
//! let client = LookupClient::from_config(&config)?;
//! ```

pub mod config;
pub mod lens;

// =============================================================================
// Configuration
// =============================================================================

pub use config::IpstackConfig;

// =============================================================================
// Lens Module
// =============================================================================

pub use lens::lookup::{
    ApiError, LookupArgs, LookupClient, LookupError, LookupResult, Transport, UreqTransport,
    DEFAULT_API_HOST, DEFAULT_CLIENT_TIMEOUT,
};
pub use lens::utils::OutputFormat;
