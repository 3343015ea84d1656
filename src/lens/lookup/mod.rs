//! IP geolocation lookup lens
//!
//! This module provides a typed client for the ipstack API. A single
//! [`LookupClient`] holds the access key, protocol preference and a pooled
//! transport, and answers single and bulk lookups with [`LookupResult`]s.

pub mod error;
pub mod transport;
pub mod types;

pub use error::LookupError;
pub use transport::{timeout_from_secs, Transport, UreqTransport};
pub use types::{
    ApiError, LookupConnection, LookupCurrency, LookupLanguage, LookupLocation, LookupResult,
    LookupSecurity, LookupSummary, LookupTimeZone,
};

use crate::config::IpstackConfig;
use crate::lens::utils::OutputFormat;
use serde::de::DeserializeOwned;
use std::io::Read;
use url::form_urlencoded;
use tabled::settings::Style;
use tabled::Table;
use tracing::debug;

/// Recommended timeout in seconds for calls to the ipstack API
pub const DEFAULT_CLIENT_TIMEOUT: u64 = 5;

/// Host serving the ipstack API
pub const DEFAULT_API_HOST: &str = "api.ipstack.com";

// =============================================================================
// Args
// =============================================================================

/// Arguments for lookup operations
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct LookupArgs {
    /// IP addresses to look up
    #[cfg_attr(feature = "cli", clap(value_name = "IP", required = true))]
    pub ips: Vec<String>,

    /// Access key, overrides the configured one
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub access_key: Option<String>,

    /// Use https instead of http (https needs a paid plan)
    #[cfg_attr(feature = "cli", clap(long))]
    pub https: bool,

    /// Request timeout in seconds, 0 disables the timeout
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub timeout: Option<u64>,
}

impl LookupArgs {
    /// Create args for the given IPs
    pub fn new<S: Into<String>>(ips: impl IntoIterator<Item = S>) -> Self {
        Self {
            ips: ips.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Layer the command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, mut config: IpstackConfig) -> IpstackConfig {
        if let Some(key) = &self.access_key {
            config.access_key = Some(key.clone());
        }
        if self.https {
            config.https = true;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the ipstack API
///
/// The client is immutable after construction and can be shared between
/// threads; the transport is created once and reused for every call.
///
/// # Example
///
/// ```rust,ignore
/// use ipstack::lens::lookup::{LookupClient, DEFAULT_CLIENT_TIMEOUT};
///
/// let client = LookupClient::new("my-access-key", false, DEFAULT_CLIENT_TIMEOUT);
///
/// let result = client.check("134.201.250.155")?;
/// println!("{:?}", result.country_name);
///
/// let results = client.check_bulk(&["1.1.1.1", "8.8.8.8"])?;
/// assert_eq!(results.len(), 2);
/// ```
pub struct LookupClient {
    access_key: String,
    use_https: bool,
    host: String,
    transport: Box<dyn Transport>,
}

impl LookupClient {
    /// Create a client with a pooled HTTP transport.
    ///
    /// `timeout_secs` bounds both connection establishment and the whole
    /// request. Zero disables the timeout.
    pub fn new(access_key: impl Into<String>, use_https: bool, timeout_secs: u64) -> Self {
        let transport = UreqTransport::new(timeout_from_secs(timeout_secs));
        Self::with_transport(access_key, use_https, Box::new(transport))
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(
        access_key: impl Into<String>,
        use_https: bool,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            use_https,
            host: DEFAULT_API_HOST.to_string(),
            transport,
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &IpstackConfig) -> Result<Self, LookupError> {
        let access_key = match config.access_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(LookupError::MissingAccessKey),
        };
        Ok(Self::new(access_key, config.https, config.timeout_secs).with_host(&config.host))
    }

    /// Send requests to a different host (and optional port)
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Host requests are sent to
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Whether requests use https
    pub fn uses_https(&self) -> bool {
        self.use_https
    }

    /// Look up a single IP address.
    ///
    /// Issues exactly one request through [`LookupClient::check_bulk`].
    pub fn check(&self, ip: &str) -> Result<LookupResult, LookupError> {
        let mut results = self.check_bulk(&[ip])?;
        if results.len() != 1 {
            return Err(LookupError::UnexpectedResultCount {
                expected: 1,
                actual: results.len(),
            });
        }
        Ok(results.remove(0))
    }

    /// Look up several IP addresses with one request.
    ///
    /// The API answers a single IP with a JSON object and several IPs with a
    /// JSON array, so the number of requested IPs selects how the body is
    /// decoded. Results are returned in the order the API sends them.
    pub fn check_bulk<S: AsRef<str>>(&self, ips: &[S]) -> Result<Vec<LookupResult>, LookupError> {
        if ips.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let url = self.request_url(ips);
        debug!(
            "querying ipstack for {} ip(s): {}",
            ips.len(),
            self.redact(&url)
        );

        // the reader is dropped at the end of this block, before decoding
        let body = {
            let mut reader = self.transport.get(&url)?;
            let mut body = Vec::new();
            reader
                .read_to_end(&mut body)
                .map_err(|e| LookupError::Transport(ureq::Error::Io(e)))?;
            body
        };

        if ips.len() > 1 {
            decode_payload::<Vec<LookupResult>>(&body)
        } else {
            decode_payload::<LookupResult>(&body).map(|result| vec![result])
        }
    }

    /// URL that a lookup of `ips` requests, access key included.
    ///
    /// The access key is form-encoded; the IPs are joined as given.
    pub fn request_url<S: AsRef<str>>(&self, ips: &[S]) -> String {
        let protocol = if self.use_https { "https://" } else { "http://" };
        let ips = ips.iter().map(|ip| ip.as_ref()).collect::<Vec<_>>().join(",");
        format!(
            "{}{}/{}?access_key={}&hostname=1&language=en&output=json",
            protocol,
            self.host,
            ips,
            self.encoded_access_key()
        )
    }

    fn encoded_access_key(&self) -> String {
        form_urlencoded::byte_serialize(self.access_key.as_bytes()).collect()
    }

    /// Same as [`LookupClient::request_url`] with the access key masked
    pub fn redacted_url<S: AsRef<str>>(&self, ips: &[S]) -> String {
        self.redact(&self.request_url(ips))
    }

    fn redact(&self, url: &str) -> String {
        if self.access_key.is_empty() {
            return url.to_string();
        }
        url.replace(
            &format!("access_key={}", self.encoded_access_key()),
            "access_key=***",
        )
    }

    /// Format lookup results for display
    pub fn format_result(&self, results: &[LookupResult], format: &OutputFormat) -> String {
        match format {
            OutputFormat::Table => Table::new(summaries(results))
                .with(Style::rounded())
                .to_string(),
            OutputFormat::Markdown => Table::new(summaries(results))
                .with(Style::markdown())
                .to_string(),
            OutputFormat::Json => serde_json::to_string(results).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(results).unwrap_or_default(),
            OutputFormat::JsonLine => results
                .iter()
                .map(|r| serde_json::to_string(r).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Psv => {
                let mut lines = vec!["ip|hostname|country|region|city|latitude|longitude|asn|isp"
                    .to_string()];
                for s in summaries(results) {
                    lines.push(format!(
                        "{}|{}|{}|{}|{}|{}|{}|{}|{}",
                        s.ip,
                        s.hostname,
                        s.country,
                        s.region,
                        s.city,
                        s.latitude,
                        s.longitude,
                        s.asn,
                        s.isp
                    ));
                }
                lines.join("\n")
            }
        }
    }
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient")
            .field("access_key", &"***")
            .field("use_https", &self.use_https)
            .field("host", &self.host)
            .finish()
    }
}

fn summaries(results: &[LookupResult]) -> Vec<LookupSummary> {
    results.iter().map(LookupSummary::from).collect()
}

/// Decode a response body into `T`, turning an error envelope into
/// [`LookupError::Api`]
fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, LookupError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if let Some(error) = ApiError::from_envelope(&value) {
        return Err(LookupError::Api(error));
    }
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Cursor, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    /// Body reader that counts how many times it is dropped
    struct TrackedBody {
        inner: Cursor<Vec<u8>>,
        drops: Arc<AtomicUsize>,
    }

    impl Read for TrackedBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedBody {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Transport answering every request with a fixed body
    struct StubTransport {
        body: String,
        calls: Arc<AtomicUsize>,
        drops: Arc<AtomicUsize>,
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl StubTransport {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
                drops: Arc::new(AtomicUsize::new(0)),
                urls: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    impl Transport for StubTransport {
        fn get(&self, url: &str) -> Result<Box<dyn Read>, ureq::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            Ok(Box::new(TrackedBody {
                inner: Cursor::new(self.body.clone().into_bytes()),
                drops: self.drops.clone(),
            }))
        }
    }

    /// Transport that always fails to connect
    struct FailingTransport;

    impl Transport for FailingTransport {
        fn get(&self, _url: &str) -> Result<Box<dyn Read>, ureq::Error> {
            Err(ureq::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "connection timed out",
            )))
        }
    }

    /// Transport whose body stream breaks halfway
    struct BrokenBodyTransport;

    struct BrokenBody;

    impl Read for BrokenBody {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))
        }
    }

    impl Transport for BrokenBodyTransport {
        fn get(&self, _url: &str) -> Result<Box<dyn Read>, ureq::Error> {
            Ok(Box::new(BrokenBody))
        }
    }

    fn stub_client(body: &str) -> (LookupClient, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let transport = StubTransport::new(body);
        let calls = transport.calls.clone();
        let drops = transport.drops.clone();
        let client = LookupClient::with_transport("testkey", false, Box::new(transport));
        (client, calls, drops)
    }

    #[test]
    fn test_empty_input_issues_no_request() {
        let (client, calls, _) = stub_client("{}");
        let ips: [&str; 0] = [];
        let err = client.check_bulk(&ips).unwrap_err();
        assert!(matches!(err, LookupError::EmptyInput));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_check_single_object() {
        let (client, calls, drops) =
            stub_client(r#"{"ip":"1.2.3.4","country_name":"Testland"}"#);
        let result = client.check("1.2.3.4").unwrap();
        assert_eq!(result.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(result.country_name.as_deref(), Some("Testland"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_check_matches_bulk_of_one() {
        let body = r#"{"ip":"1.2.3.4","city":"Testville","latitude":1.5}"#;
        let (client, _, _) = stub_client(body);
        let single = client.check("1.2.3.4").unwrap();
        let bulk = client.check_bulk(&["1.2.3.4"]).unwrap();
        assert_eq!(bulk.len(), 1);
        assert_eq!(single, bulk[0]);
    }

    #[test]
    fn test_check_bulk_preserves_order() {
        let (client, calls, drops) = stub_client(r#"[{"ip":"1.2.3.4"},{"ip":"5.6.7.8"}]"#);
        let results = client.check_bulk(&["1.2.3.4", "5.6.7.8"]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(results[1].ip.as_deref(), Some("5.6.7.8"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cardinality_selects_decoder() {
        // an array answer to a single-ip request is a shape mismatch
        let (client, _, _) = stub_client(r#"[{"ip":"1.2.3.4"}]"#);
        assert!(client.check("1.2.3.4").unwrap_err().is_decode());

        // and an object answer to a bulk request is too
        let (client, _, _) = stub_client(r#"{"ip":"1.2.3.4"}"#);
        assert!(client
            .check_bulk(&["1.2.3.4", "5.6.7.8"])
            .unwrap_err()
            .is_decode());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let (client, _, drops) = stub_client("{\"ip\": \"1.2.3.4\"");
        assert!(client.check("1.2.3.4").unwrap_err().is_decode());
        assert!(client
            .check_bulk(&["1.2.3.4", "5.6.7.8"])
            .unwrap_err()
            .is_decode());
        // released once per call even though decoding failed
        assert_eq!(drops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_transport_failure() {
        let client = LookupClient::with_transport("testkey", false, Box::new(FailingTransport));
        let err = client.check("1.2.3.4").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("connection timed out"));
        assert!(client
            .check_bulk(&["1.2.3.4", "5.6.7.8"])
            .unwrap_err()
            .is_transport());
    }

    #[test]
    fn test_broken_body_is_transport_error() {
        let client =
            LookupClient::with_transport("testkey", false, Box::new(BrokenBodyTransport));
        assert!(client.check("1.2.3.4").unwrap_err().is_transport());
    }

    #[test]
    fn test_error_envelope_is_api_error() {
        let body = r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"You have not supplied a valid API Access Key."}}"#;
        let (client, _, drops) = stub_client(body);
        match client.check("1.2.3.4") {
            Err(LookupError::Api(e)) => {
                assert_eq!(e.code, 101);
                assert_eq!(e.kind, "invalid_access_key");
            }
            other => panic!("expected api error, got {:?}", other),
        }
        match client.check_bulk(&["1.2.3.4", "5.6.7.8"]) {
            Err(LookupError::Api(e)) => assert_eq!(e.code, 101),
            other => panic!("expected api error, got {:?}", other),
        }
        assert_eq!(drops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_request_url() {
        let (client, _, _) = stub_client("{}");
        assert_eq!(
            client.request_url(&["1.2.3.4", "5.6.7.8"]),
            "http://api.ipstack.com/1.2.3.4,5.6.7.8?access_key=testkey&hostname=1&language=en&output=json"
        );
        assert_eq!(
            client.redacted_url(&["1.2.3.4"]),
            "http://api.ipstack.com/1.2.3.4?access_key=***&hostname=1&language=en&output=json"
        );

        let client = LookupClient::new("testkey", true, 5).with_host("ipstack.internal:8443");
        assert!(client.uses_https());
        assert_eq!(
            client.request_url(&["::1"]),
            "https://ipstack.internal:8443/::1?access_key=testkey&hostname=1&language=en&output=json"
        );
    }

    #[test]
    fn test_request_url_encodes_access_key() {
        let client = LookupClient::with_transport("a&b c", false, Box::new(FailingTransport));
        assert_eq!(
            client.request_url(&["1.2.3.4"]),
            "http://api.ipstack.com/1.2.3.4?access_key=a%26b+c&hostname=1&language=en&output=json"
        );
        assert_eq!(
            client.redacted_url(&["1.2.3.4"]),
            "http://api.ipstack.com/1.2.3.4?access_key=***&hostname=1&language=en&output=json"
        );
    }

    #[test]
    fn test_stub_transport_sees_url() {
        let transport = StubTransport::new(r#"{"ip":"1.2.3.4"}"#);
        let urls = transport.urls.clone();
        let client = LookupClient::with_transport("abc", true, Box::new(transport));
        client.check("1.2.3.4").unwrap();
        let urls = urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("https://api.ipstack.com/1.2.3.4?"));
        assert!(urls[0].contains("access_key=abc"));
    }

    #[test]
    fn test_from_config() {
        let config = IpstackConfig {
            access_key: None,
            ..Default::default()
        };
        assert!(matches!(
            LookupClient::from_config(&config),
            Err(LookupError::MissingAccessKey)
        ));

        let config = IpstackConfig {
            access_key: Some("key".to_string()),
            https: true,
            host: "localhost:1234".to_string(),
            ..Default::default()
        };
        let client = LookupClient::from_config(&config).unwrap();
        assert!(client.uses_https());
        assert_eq!(client.host(), "localhost:1234");
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LookupClient>();

        let (client, calls, _) = stub_client(r#"{"ip":"1.2.3.4"}"#);
        let client = Arc::new(client);
        let handles = (0..4)
            .map(|_| {
                let client = client.clone();
                thread::spawn(move || client.check("1.2.3.4").unwrap())
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap().ip.as_deref(), Some("1.2.3.4"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_debug_hides_access_key() {
        let (client, _, _) = stub_client("{}");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("testkey"));
    }

    #[test]
    fn test_args_apply_to_config() {
        let args = LookupArgs {
            ips: vec!["1.2.3.4".to_string()],
            access_key: Some("override".to_string()),
            https: true,
            timeout: Some(0),
        };
        let config = args.apply_to(IpstackConfig::default());
        assert_eq!(config.access_key.as_deref(), Some("override"));
        assert!(config.https);
        assert_eq!(config.timeout_secs, 0);

        let args = LookupArgs::new(["1.2.3.4"]);
        let config = args.apply_to(IpstackConfig::default());
        assert_eq!(config.timeout_secs, DEFAULT_CLIENT_TIMEOUT);
    }

    #[test]
    fn test_format_result() {
        let (client, _, _) = stub_client("{}");
        let results = vec![LookupResult {
            ip: Some("1.1.1.1".to_string()),
            country_name: Some("Australia".to_string()),
            ..Default::default()
        }];

        let psv = client.format_result(&results, &OutputFormat::Psv);
        let mut lines = psv.lines();
        assert_eq!(
            lines.next(),
            Some("ip|hostname|country|region|city|latitude|longitude|asn|isp")
        );
        assert_eq!(lines.next(), Some("1.1.1.1|-|Australia|-|-|-|-|-|-"));

        let json = client.format_result(&results, &OutputFormat::Json);
        assert!(json.starts_with('['));
        assert!(json.contains("\"country_name\":\"Australia\""));

        let table = client.format_result(&results, &OutputFormat::Table);
        assert!(table.contains("1.1.1.1"));
    }

    // -------------------------------------------------------------------------
    // against a local HTTP server through the real ureq transport
    // -------------------------------------------------------------------------

    /// Serve one HTTP response on a local port and report the request line
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = listener.local_addr().unwrap().to_string();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request_line.trim_end().to_string()).unwrap();
        });
        (host, rx)
    }

    #[test]
    fn test_http_single_lookup() {
        let (host, rx) = serve_once("200 OK", r#"{"ip":"1.2.3.4","country_name":"Testland"}"#);
        let client = LookupClient::new("testkey", false, 5).with_host(host);
        let result = client.check("1.2.3.4").unwrap();
        assert_eq!(result.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(result.country_name.as_deref(), Some("Testland"));
        assert_eq!(
            rx.recv().unwrap(),
            "GET /1.2.3.4?access_key=testkey&hostname=1&language=en&output=json HTTP/1.1"
        );
    }

    #[test]
    fn test_http_bulk_lookup() {
        let (host, rx) = serve_once("200 OK", r#"[{"ip":"1.2.3.4"},{"ip":"5.6.7.8"}]"#);
        let client = LookupClient::new("testkey", false, 5).with_host(host);
        let results = client.check_bulk(&["1.2.3.4", "5.6.7.8"]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(results[1].ip.as_deref(), Some("5.6.7.8"));
        assert!(rx.recv().unwrap().starts_with("GET /1.2.3.4,5.6.7.8?"));
    }

    #[test]
    fn test_http_error_status_still_decoded() {
        let (host, _rx) = serve_once(
            "401 Unauthorized",
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"bad key"}}"#,
        );
        let client = LookupClient::new("wrong", false, 5).with_host(host);
        match client.check("1.2.3.4") {
            Err(LookupError::Api(e)) => assert_eq!(e.kind, "invalid_access_key"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_http_connection_refused() {
        // grab a free port, then close it so nothing listens there
        let host = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let client = LookupClient::new("testkey", false, 2).with_host(host);
        assert!(client.check("1.2.3.4").unwrap_err().is_transport());
    }

    /// Accept one connection and hold it open without answering
    fn stall_once(hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(hold);
        });
        host
    }

    /// Answer one request after a delay
    fn serve_late(delay: Duration, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            thread::sleep(delay);
            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        host
    }

    #[test]
    fn test_http_timeout_is_transport_error() {
        let host = stall_once(Duration::from_secs(5));
        let client = LookupClient::new("testkey", false, 1).with_host(host);

        let start = Instant::now();
        let err = client.check("1.2.3.4").unwrap_err();
        let elapsed = start.elapsed();

        assert!(err.is_transport(), "unexpected error: {}", err);
        assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    }

    #[test]
    fn test_http_zero_timeout_waits_for_answer() {
        let host = serve_late(Duration::from_millis(1500), r#"{"ip":"1.2.3.4"}"#);
        let client = LookupClient::new("testkey", false, 0).with_host(host);
        let result = client.check("1.2.3.4").unwrap();
        assert_eq!(result.ip.as_deref(), Some("1.2.3.4"));
    }
}
