//! Lookup lens types
//!
//! Records decoded from the ipstack API. Every field is optional since the
//! API omits or nulls fields depending on the subscription plan and on how
//! much it knows about an address.

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One geolocation record for one queried IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    /// The queried IP address
    pub ip: Option<String>,
    /// Reverse DNS hostname (requested with `hostname=1`)
    pub hostname: Option<String>,
    /// Address family, `ipv4` or `ipv6`
    #[serde(rename = "type")]
    pub ip_type: Option<String>,
    pub continent_code: Option<String>,
    pub continent_name: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region_code: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<LookupLocation>,
    pub time_zone: Option<LookupTimeZone>,
    pub currency: Option<LookupCurrency>,
    pub connection: Option<LookupConnection>,
    pub security: Option<LookupSecurity>,
}

/// Country-level metadata of the location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupLocation {
    pub geoname_id: Option<i64>,
    pub capital: Option<String>,
    pub languages: Option<Vec<LookupLanguage>>,
    pub country_flag: Option<String>,
    pub country_flag_emoji: Option<String>,
    pub country_flag_emoji_unicode: Option<String>,
    pub calling_code: Option<String>,
    pub is_eu: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupLanguage {
    pub code: Option<String>,
    pub name: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTimeZone {
    pub id: Option<String>,
    pub current_time: Option<String>,
    /// Offset from GMT in seconds
    pub gmt_offset: Option<i64>,
    pub code: Option<String>,
    pub is_daylight_saving: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupCurrency {
    pub code: Option<String>,
    pub name: Option<String>,
    pub plural: Option<String>,
    pub symbol: Option<String>,
    pub symbol_native: Option<String>,
}

/// Network the address belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConnection {
    pub asn: Option<i64>,
    pub isp: Option<String>,
}

/// Proxy, crawler and threat assessment of the address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSecurity {
    pub is_proxy: Option<bool>,
    pub proxy_type: Option<String>,
    pub is_crawler: Option<bool>,
    pub crawler_name: Option<String>,
    pub crawler_type: Option<String>,
    pub is_tor: Option<bool>,
    pub threat_level: Option<String>,
    pub threat_types: Option<Vec<String>>,
}

/// Flattened view of a [`LookupResult`] for table and PSV output
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct LookupSummary {
    pub ip: String,
    pub hostname: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
    pub asn: String,
    pub isp: String,
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

impl From<&LookupResult> for LookupSummary {
    fn from(result: &LookupResult) -> Self {
        let connection = result.connection.as_ref();
        Self {
            ip: or_dash(&result.ip),
            hostname: or_dash(&result.hostname),
            country: or_dash(&result.country_name),
            region: or_dash(&result.region_name),
            city: or_dash(&result.city),
            latitude: result
                .latitude
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            longitude: result
                .longitude
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            asn: connection
                .and_then(|c| c.asn)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            isp: connection
                .and_then(|c| c.isp.clone())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Body of an ipstack error envelope
///
/// ```json
/// {"success": false, "error": {"code": 101, "type": "invalid_access_key", "info": "..."}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub info: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.code, self.info)
    }
}

impl ApiError {
    /// Extract the error from an ipstack error envelope.
    ///
    /// Only an object with an `error` object qualifies; records and arrays of
    /// records never do.
    pub fn from_envelope(value: &serde_json::Value) -> Option<ApiError> {
        let error = value.as_object()?.get("error")?;
        if !error.is_object() {
            return None;
        }
        serde_json::from_value(error.clone()).ok()
    }
}
