//! Lens module
//!
//! Lenses combine the business logic of an operation with the formatting of
//! its results, so the same code serves the library API and the command
//! line.
//!
//! | Lens | Purpose |
//! |------|---------|
//! | `LookupClient` | IP geolocation lookups against the ipstack API |
//!
//! ```rust,ignore
//! use ipstack::lens::lookup::{LookupClient, LookupResult, LookupError};
//! use ipstack::lens::utils::OutputFormat;
//! ```

pub mod utils;

// LookupClient - single and bulk IP geolocation lookups
pub mod lookup;
