// Session login
//
// Two-step challenge/response against `login_sid.lua`:
//   1. GET login_sid.lua                          → <Challenge>…</Challenge>
//   2. GET login_sid.lua?user=&response={c}-{md5} → <SID>…</SID>
// An all-zero SID means the password was rejected.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::action::{self, ActionExecutor, ErrorSink};
use crate::error::Error;
use crate::extract;
use crate::hash;
use crate::session::{self, Session, SessionId, SessionTiming};
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Host name the device answers to on its own LAN.
pub const DEFAULT_ADDRESS: &str = "fritz.box";

/// Time given to the WAN link after a reconnect before the new address
/// is expected to be usable.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(7);

const LOGIN_ENDPOINT: &str = "login_sid";

/// Tunables for a [`Connector`] and the sessions it creates.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub transport: TransportConfig,
    pub poll_interval: Duration,
    pub pending_sentinel: String,
    pub settle_delay: Duration,
    /// Maximum fire-and-forget actions polling at once.
    pub max_background: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            poll_interval: action::DEFAULT_POLL_INTERVAL,
            pending_sentinel: action::PENDING_SENTINEL.into(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            max_background: action::DEFAULT_MAX_BACKGROUND,
        }
    }
}

/// Entry point: knows how to reach one device and log in to it.
///
/// ```no_run
/// use fritzctl_api::{Connector, ConnectorConfig};
/// use secrecy::SecretString;
///
/// # async fn run() -> Result<(), fritzctl_api::Error> {
/// let connector = Connector::new("192.168.178.1", ConnectorConfig::default())?;
/// let session = connector.login(&SecretString::from("hunter2".to_owned())).await?;
/// println!("public IP: {}", session.internet_ip().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Connector {
    address: String,
    transport: Arc<dyn Transport>,
    executor: ActionExecutor,
    timing: Arc<SessionTiming>,
}

impl Connector {
    /// Create a connector that talks HTTP to `address` (host or host:port).
    pub fn new(address: impl Into<String>, config: ConnectorConfig) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(&config.transport)?);
        Ok(Self::with_transport(address, transport, config))
    }

    /// Create a connector for the device at [`DEFAULT_ADDRESS`].
    pub fn fritz_box(config: ConnectorConfig) -> Result<Self, Error> {
        Self::new(DEFAULT_ADDRESS, config)
    }

    /// Create a connector on top of an existing transport.
    pub fn with_transport(
        address: impl Into<String>,
        transport: Arc<dyn Transport>,
        config: ConnectorConfig,
    ) -> Self {
        let executor = ActionExecutor::new(Arc::clone(&transport), config.max_background);
        Self {
            address: address.into(),
            transport,
            executor,
            timing: Arc::new(SessionTiming {
                poll_interval: config.poll_interval,
                pending_sentinel: config.pending_sentinel,
                settle_delay: config.settle_delay,
            }),
        }
    }

    /// Route fire-and-forget action failures to `sink` instead of the log.
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.executor = self.executor.with_error_sink(sink);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Log in with the device password.
    ///
    /// Fails with [`Error::Authentication`] when the device answers with the
    /// all-zero SID, and with [`Error::Transport`] if either request fails.
    pub async fn login(&self, password: &SecretString) -> Result<Session, Error> {
        let challenge = self.fetch_challenge().await?;
        let response = hash::challenge_response(&challenge, password.expose_secret());

        let url = session::device_url(
            &self.address,
            LOGIN_ENDPOINT,
            &[("user", ""), ("response", response.as_str())],
        )?;
        debug!(address = %self.address, "sending login response");
        let body = self.transport.get(&url).await?;

        let sid: SessionId = extract::between(&body, &extract::SID)?.parse()?;
        if sid.is_sentinel() {
            return Err(Error::Authentication {
                message: "device rejected the password".into(),
            });
        }

        debug!(address = %self.address, "login successful");
        Ok(self.session(sid))
    }

    /// Reuse a session id obtained earlier, without a login round trip.
    ///
    /// Rejects the sentinel id; any other id is trusted as-is.
    pub fn resume(&self, sid: SessionId) -> Result<Session, Error> {
        if sid.is_sentinel() {
            return Err(Error::Authentication {
                message: "cannot resume the unauthenticated session id".into(),
            });
        }
        Ok(self.session(sid))
    }

    async fn fetch_challenge(&self) -> Result<String, Error> {
        let url = session::device_url(&self.address, LOGIN_ENDPOINT, &[])?;
        debug!(address = %self.address, "requesting login challenge");
        let body = self.transport.get(&url).await?;

        let challenge = extract::between(&body, &extract::CHALLENGE)?.trim();
        if challenge.is_empty() {
            return Err(Error::extraction("empty login challenge", &body));
        }
        Ok(challenge.to_owned())
    }

    fn session(&self, sid: SessionId) -> Session {
        Session::new(
            self.address.clone(),
            sid,
            Arc::clone(&self.transport),
            self.executor.clone(),
            Arc::clone(&self.timing),
        )
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("address", &self.address)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
