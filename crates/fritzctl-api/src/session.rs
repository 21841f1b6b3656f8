// Authenticated device session
//
// A `Session` is the (address, SID) pair returned by a successful login,
// plus shared handles to the transport and action executor. Every operation
// builds `http://{address}/{endpoint}.lua?sid={sid}&...` and performs one
// self-contained round trip; nothing in here is mutable.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::action::{ActionExecutor, ActionRequest};
use crate::calls::{self, CallRecord};
use crate::error::Error;
use crate::extract;
use crate::guest::{self, GuestWifiConfig};
use crate::transport::Transport;

const GUEST_ACCESS: &str = "wlan/guest_access";
const INETSTAT_MONITOR: &str = "internet/inetstat_monitor";
const CALL_LIST: &str = "fon_num/foncalls_list";

/// A 16 hex digit session id.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// The id the device reports when nobody is logged in.
    pub const SENTINEL: &'static str = "0000000000000000";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == Self::SENTINEL
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == 16 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(Error::extraction("session id is not 16 hex digits", s))
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

/// Build `http://{address}/{endpoint}.lua` with the given query pairs.
pub(crate) fn device_url(address: &str, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
    let mut url = Url::parse(&format!("http://{address}/{endpoint}.lua"))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Timing knobs a session inherits from its connector.
#[derive(Debug, Clone)]
pub(crate) struct SessionTiming {
    pub poll_interval: Duration,
    pub pending_sentinel: String,
    pub settle_delay: Duration,
}

/// An authenticated session on one device.
///
/// Obtained from [`Connector::login`](crate::Connector::login). Cheap to
/// clone and safe to share between tasks. The session never re-validates
/// itself; once the device expires the SID, operations start failing with
/// [`Error::Extraction`] (the device serves its login page instead).
#[derive(Clone)]
pub struct Session {
    address: String,
    sid: SessionId,
    transport: Arc<dyn Transport>,
    executor: ActionExecutor,
    timing: Arc<SessionTiming>,
}

impl Session {
    pub(crate) fn new(
        address: String,
        sid: SessionId,
        transport: Arc<dyn Transport>,
        executor: ActionExecutor,
        timing: Arc<SessionTiming>,
    ) -> Self {
        Self {
            address,
            sid,
            transport,
            executor,
            timing,
        }
    }

    /// The device host this session belongs to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The session id issued at login.
    pub fn sid(&self) -> &SessionId {
        &self.sid
    }

    /// The executor used for action requests (e.g. to wait for background
    /// actions on shutdown).
    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Build a session-scoped URL: `http://{address}/{endpoint}.lua?sid={sid}&{params}`.
    pub fn request_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, Error> {
        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("sid", self.sid.as_str()));
        query.extend_from_slice(params);
        device_url(&self.address, endpoint, &query)
    }

    // ── Guest WiFi ───────────────────────────────────────────────────

    /// Enable the guest network with the given settings.
    pub async fn turn_on_guest_wifi(&self, config: &GuestWifiConfig) -> Result<(), Error> {
        let url = self.request_url(GUEST_ACCESS, &[])?;
        debug!(ssid = %config.ssid, security = %config.security_mode, "enabling guest WiFi");
        self.transport.post_form(&url, config.form_body()).await?;
        Ok(())
    }

    /// Disable the guest network. No effect if it is already off.
    pub async fn turn_off_guest_wifi(&self) -> Result<(), Error> {
        let url = self.request_url(GUEST_ACCESS, &[])?;
        debug!("disabling guest WiFi");
        self.transport
            .post_form(&url, guest::disable_form_body())
            .await?;
        Ok(())
    }

    // ── Internet connection ──────────────────────────────────────────

    /// The public IP address the device currently has on its WAN link.
    pub async fn internet_ip(&self) -> Result<String, Error> {
        let url = self.request_url(INETSTAT_MONITOR, &[])?;
        let body = self.transport.get(&url).await?;
        let ip = extract::between(&body, &extract::INTERNET_IP)?;
        Ok(ip.trim().to_owned())
    }

    /// Drop and re-establish the WAN connection, which usually yields a
    /// new public IP.
    ///
    /// Waits for the disconnect to be acknowledged, then for the connect,
    /// then for the configured settle delay so the new address has time
    /// to be assigned.
    pub async fn reconnect_to_internet(&self) -> Result<(), Error> {
        self.reconnect_to_internet_until(&CancellationToken::new())
            .await
    }

    /// Like [`reconnect_to_internet`](Self::reconnect_to_internet), but
    /// `cancel` cuts the final settle delay short. A cancelled settle
    /// delay still counts as success.
    pub async fn reconnect_to_internet_until(&self, cancel: &CancellationToken) -> Result<(), Error> {
        info!("disconnecting from the internet");
        self.run_action(INETSTAT_MONITOR, "disconnect").await?;

        info!("connecting to the internet");
        self.run_action(INETSTAT_MONITOR, "connect").await?;

        debug!(delay = ?self.timing.settle_delay, "waiting for the connection to settle");
        tokio::select! {
            () = tokio::time::sleep(self.timing.settle_delay) => {}
            () = cancel.cancelled() => debug!("settle delay interrupted"),
        }
        Ok(())
    }

    async fn run_action(&self, endpoint: &str, action: &str) -> Result<(), Error> {
        let url = self.request_url(endpoint, &[("useajax", "1"), ("action", action)])?;
        let request = ActionRequest::new(url)
            .poll_interval(self.timing.poll_interval)
            .pending_sentinel(self.timing.pending_sentinel.as_str());
        self.executor.execute(request).await
    }

    // ── Telephony ────────────────────────────────────────────────────

    /// Fetch the call list as exported by the device's CSV download.
    pub async fn call_list(&self) -> Result<Vec<CallRecord>, Error> {
        let url = self.request_url(CALL_LIST, &[("csv", "")])?;
        let body = self.transport.get(&url).await?;
        calls::parse_call_list(&body)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("sid", &self.sid)
            .finish_non_exhaustive()
    }
}
