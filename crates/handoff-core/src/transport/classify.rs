//! Classify curl errors for logging and outcome decisions.

/// Coarse cause of a failed loopback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request exceeded its total or connect timeout.
    Timeout,
    /// Nothing listening, connection reset, or the peer hung up mid-response.
    Connection,
    /// Anything else (oversized body, malformed response, local setup).
    Other,
}

/// Classify a curl error into a [`FailureKind`].
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connection;
    }
    FailureKind::Other
}
