use thiserror::Error;

/// Top-level error type for the `fritzctl-api` crate.
///
/// Covers every failure mode of a FRITZ!Box session: the login handshake,
/// HTTP transport, and scraping values out of device responses.
/// The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device answered the login with the all-zero session id.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, non-2xx status, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error (usually a bad device address).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Expected text was missing or malformed in a device response.
    ///
    /// Usually means the firmware changed its markup or the session has
    /// expired and the device served its login page instead.
    #[error("Unexpected device response: {what} (body preview: {preview:?})")]
    Extraction { what: String, preview: String },
}

impl Error {
    /// Build an [`Error::Extraction`] carrying a short preview of the body.
    pub(crate) fn extraction(what: impl Into<String>, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Extraction {
            what: what.into(),
            preview,
        }
    }

    /// Returns `true` if the device rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_preview_is_truncated() {
        let body = "x".repeat(500);
        let err = Error::extraction("missing marker", &body);
        match err {
            Error::Extraction { what, preview } => {
                assert_eq!(what, "missing marker");
                assert_eq!(preview.len(), 200);
            }
            other => panic!("expected Extraction, got {other:?}"),
        }
    }

    #[test]
    fn authentication_is_not_transient() {
        let err = Error::Authentication {
            message: "wrong password".into(),
        };
        assert!(err.is_auth_failure());
        assert!(!err.is_transient());
    }
}
