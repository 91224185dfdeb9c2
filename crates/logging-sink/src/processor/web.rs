use logging::LogRecord;

use super::Processor;

/// Request details exposed by the hosting web server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestInfo {
    /// Requested URI.
    pub url: Option<String>,
    /// Client address.
    pub ip: Option<String>,
    /// HTTP method.
    pub http_method: Option<String>,
    /// Server name.
    pub server: Option<String>,
    /// Referrer header.
    pub referrer: Option<String>,
    /// Per-request identifier assigned by the server.
    pub unique_id: Option<String>,
}

impl RequestInfo {
    /// Reads request details from CGI-style environment variables.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads request details through `lookup`.
    ///
    /// Returns `None` when neither `REQUEST_URI` nor `REMOTE_ADDR` is set,
    /// meaning no request is being served.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("REQUEST_URI");
        let ip = lookup("REMOTE_ADDR");
        if url.is_none() && ip.is_none() {
            return None;
        }
        Some(Self {
            url,
            ip,
            http_method: lookup("REQUEST_METHOD"),
            server: lookup("SERVER_NAME"),
            referrer: lookup("HTTP_REFERER"),
            unique_id: lookup("UNIQUE_ID"),
        })
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("url", self.url.as_deref()),
            ("ip", self.ip.as_deref()),
            ("http_method", self.http_method.as_deref()),
            ("server", self.server.as_deref()),
            ("referrer", self.referrer.as_deref()),
            ("unique_id", self.unique_id.as_deref()),
        ]
    }
}

/// Adds request details to `extra`.
///
/// Missing fields are written as `null`, except `unique_id` which is only
/// added when the server supplies one.
#[derive(Clone, Debug, Default)]
pub struct WebProcessor {
    request: Option<RequestInfo>,
}

impl WebProcessor {
    /// Creates a processor bound to `request`.
    pub const fn new(request: Option<RequestInfo>) -> Self {
        Self { request }
    }

    /// Creates a processor from the current process environment.
    pub fn from_env() -> Self {
        Self::new(RequestInfo::from_env())
    }

    /// Request the processor reports, if any.
    pub const fn request(&self) -> Option<&RequestInfo> {
        self.request.as_ref()
    }
}

impl Processor for WebProcessor {
    fn process(&self, record: LogRecord) -> LogRecord {
        let Some(request) = &self.request else {
            return record;
        };
        request
            .fields()
            .into_iter()
            .filter(|(key, value)| *key != "unique_id" || value.is_some())
            .fold(record, |record, (key, value)| {
                record.with_extra(key, value.map(str::to_owned))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::{Context, Level};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn record() -> LogRecord {
        LogRecord::new(Arc::from("T"), Level::Error, json!("x"), Context::new())
    }

    #[test]
    fn no_request_without_uri_or_address() {
        let request = RequestInfo::from_lookup(lookup(&[("SERVER_NAME", "h")]));
        assert_eq!(request, None);
        let record = WebProcessor::new(None).process(record());
        assert!(record.extra().is_empty());
    }

    #[test]
    fn request_fields_land_in_extra() {
        let request = RequestInfo::from_lookup(lookup(&[
            ("REQUEST_URI", "/blog/view/4"),
            ("REMOTE_ADDR", "10.0.0.2"),
            ("REQUEST_METHOD", "POST"),
        ]));
        let processor = WebProcessor::new(request);
        let record = processor.process(record());
        let extra = record.extra();

        assert_eq!(extra.get("url"), Some(&json!("/blog/view/4")));
        assert_eq!(extra.get("ip"), Some(&json!("10.0.0.2")));
        assert_eq!(extra.get("http_method"), Some(&json!("POST")));
        assert_eq!(extra.get("server"), Some(&Value::Null));
        assert_eq!(extra.get("referrer"), Some(&Value::Null));
        assert!(!extra.contains_key("unique_id"));
    }

    #[test]
    fn unique_id_is_included_when_present() {
        let env = lookup(&[("REMOTE_ADDR", "::1"), ("UNIQUE_ID", "Zk3a")]);
        let request = RequestInfo::from_lookup(env);
        let record = WebProcessor::new(request).process(record());
        assert_eq!(record.extra().get("unique_id"), Some(&json!("Zk3a")));
    }
}
