use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::acl::RequestContext;
use crate::services::auth::BasicCredentials;

/// `RequestContext` over an axum request's headers.
///
/// Inbound values are decoded lossily up front: a header the client sent is never reported
/// as absent, even when its bytes are not visible ASCII.
///
/// Response headers set by rules are buffered here; the access middleware copies them onto
/// the response only after the rule admitted the request.
#[derive(Debug, Default)]
pub struct HttpRequestContext {
    headers: HeaderMap<String>,
    response_headers: Vec<(String, String)>,
}

impl HttpRequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        let mut decoded = HeaderMap::with_capacity(headers.len());
        for (name, value) in &headers {
            decoded.append(
                name.clone(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        Self {
            headers: decoded,
            response_headers: Vec::new(),
        }
    }

    /// Last value recorded for a response header.
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Buffered response headers, converted for the wire. Entries that are not valid HTTP
    /// header names/values are dropped with a warning.
    pub fn into_response_headers(self) -> HeaderMap {
        let mut out = HeaderMap::new();
        for (name, value) in self.response_headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    out.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "dropping invalid response header"),
            }
        }
        out
    }
}

impl RequestContext for HttpRequestContext {
    fn header(&self, name: &str) -> Option<&str> {
        // HeaderMap lookups are case-insensitive
        self.headers.get(name).map(String::as_str)
    }

    fn variable(&self, name: &str) -> Option<String> {
        match name {
            "user" => BasicCredentials::from_context(self).map(|c| c.user),
            header => self.header(header).map(str::to_string),
        }
    }

    fn set_response_header(&mut self, name: &str, value: String) {
        self.response_headers.push((name.to_string(), value));
    }
}
