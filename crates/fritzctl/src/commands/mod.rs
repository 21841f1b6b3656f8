//! Command dispatch: bridges CLI args -> device session -> output formatting.

pub mod calls;
pub mod config_cmd;
pub mod guest;
pub mod internet;
pub mod login;

use fritzctl_api::{Connector, Session, SessionId};
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// A logged-in session plus the context needed to explain its errors.
pub struct Ctx {
    pub session: Session,
    pub profile_name: String,
}

impl Ctx {
    /// Wrap a library error with this session's address and profile.
    pub fn api_err(&self, err: fritzctl_api::Error) -> CliError {
        CliError::from_api(err, self.session.address(), &self.profile_name)
    }
}

/// Build a connector for the active profile and log in (or resume `--sid`).
pub async fn open_session(global: &GlobalOpts, config: &Config) -> Result<Ctx, CliError> {
    let device = config::resolve_device(global, config)?;
    let address = device.profile.address.as_str();
    let api_err = |err| CliError::from_api(err, address, &device.profile_name);

    let connector = Connector::new(address, device.connector.clone()).map_err(api_err)?;

    let session = if let Some(ref sid) = global.sid {
        debug!(address, "resuming session");
        let sid: SessionId = sid.parse().map_err(|_| CliError::Validation {
            field: "sid".into(),
            reason: "expected 16 hex digits".into(),
        })?;
        connector.resume(sid).map_err(api_err)?
    } else {
        let password = config::resolve_password(global, &device)?;
        connector.login(&password).await.map_err(api_err)?
    };

    Ok(Ctx {
        session,
        profile_name: device.profile_name.clone(),
    })
}

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(ctx, global),
        Command::Ip => internet::ip(ctx, global).await,
        Command::Reconnect(args) => internet::reconnect(ctx, args, global).await,
        Command::GuestWifi(args) => guest::handle(ctx, args, global).await,
        Command::Calls(args) => calls::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
