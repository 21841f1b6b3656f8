// fritzctl-api: Async Rust client for the FRITZ!Box web interface

pub mod action;
pub mod calls;
pub mod connector;
pub mod error;
pub mod extract;
pub mod guest;
pub mod hash;
pub mod session;
pub mod transport;

pub use action::{ActionExecutor, ActionMode, ActionRequest, ErrorSink};
pub use calls::{CallKind, CallRecord};
pub use connector::{Connector, ConnectorConfig, DEFAULT_ADDRESS};
pub use error::Error;
pub use guest::{GuestWifiConfig, SecurityMode};
pub use session::{Session, SessionId};
pub use transport::{HttpTransport, Transport, TransportConfig};
