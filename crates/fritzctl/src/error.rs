//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fritzctl_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UNEXPECTED_RESPONSE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the FRITZ!Box at {address}")]
    #[diagnostic(
        code(fritzctl::connection_failed),
        help(
            "Check that the device is reachable from this machine.\n\
             Address: {address}\n\
             Try: fritzctl --address 192.168.178.1 ip"
        )
    )]
    ConnectionFailed {
        address: String,
        #[source]
        source: fritzctl_api::Error,
    },

    #[error("Request to {address} timed out")]
    #[diagnostic(
        code(fritzctl::timeout),
        help("Increase the timeout with --timeout or check the device's responsiveness.")
    )]
    Timeout {
        address: String,
        #[source]
        source: fritzctl_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed for profile '{profile}': {message}")]
    #[diagnostic(
        code(fritzctl::auth_failed),
        help(
            "The device rejected the password.\n\
             Update it with: fritzctl config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(fritzctl::no_credentials),
        help(
            "Configure one with: fritzctl config init\n\
             Or set the FRITZ_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Unexpected response from the device: {0}")]
    #[diagnostic(
        code(fritzctl::unexpected_response),
        help(
            "The session may have expired, or the firmware serves a page this tool does not know.\n\
             Log in again, or rerun with -vv to see the requests."
        )
    )]
    UnexpectedResponse(#[source] fritzctl_api::Error),

    #[error(transparent)]
    #[diagnostic(code(fritzctl::device))]
    Device(fritzctl_api::Error),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fritzctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fritzctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fritzctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(fritzctl::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON output: {0}")]
    #[diagnostic(code(fritzctl::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML output: {0}")]
    #[diagnostic(code(fritzctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::UnexpectedResponse(_) => exit_code::UNEXPECTED_RESPONSE,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the device address and profile to a library error.
    pub fn from_api(err: fritzctl_api::Error, address: &str, profile: &str) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                address: address.into(),
                source: err,
            };
        }
        if err.is_transient() {
            return Self::ConnectionFailed {
                address: address.into(),
                source: err,
            };
        }
        match err {
            fritzctl_api::Error::Authentication { message } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            fritzctl_api::Error::Extraction { .. } => Self::UnexpectedResponse(err),
            fritzctl_api::Error::InvalidUrl(_) => Self::Validation {
                field: "address".into(),
                reason: err.to_string(),
            },
            other => Self::Device(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
