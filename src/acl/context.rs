/// Per-request view handed to rules.
///
/// Implementations own the transport details. Rules only read inbound headers,
/// resolve expression variables, and record outbound headers.
pub trait RequestContext: Send + Sync {
    /// Inbound header lookup. Names are matched case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of a group-expression variable (`@{name}`), if present for this request.
    fn variable(&self, name: &str) -> Option<String>;

    /// Record a header to be sent back with the response.
    fn set_response_header(&mut self, name: &str, value: String);
}
