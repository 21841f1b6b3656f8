//! Guest WiFi command handlers.

use fritzctl_api::{GuestWifiConfig, SecurityMode};

use crate::cli::{GlobalOpts, GuestWifiArgs, GuestWifiCommand, GuestWifiOnArgs, SecurityArg};
use crate::error::CliError;
use crate::output;

use super::Ctx;

impl From<SecurityArg> for SecurityMode {
    fn from(arg: SecurityArg) -> Self {
        match arg {
            SecurityArg::Wpa => Self::Wpa,
            SecurityArg::Wpa2 => Self::Wpa2,
            SecurityArg::WpaWpa2 => Self::WpaWpa2,
            SecurityArg::None => Self::None,
        }
    }
}

/// Translate `guest-wifi on` flags into device settings.
///
/// WPA keys must be 8 to 63 characters; an open network takes no key.
fn build_config(args: GuestWifiOnArgs) -> Result<GuestWifiConfig, CliError> {
    let security_mode = SecurityMode::from(args.security);
    let key_len = args.key.chars().count();
    if security_mode != SecurityMode::None && !(8..=63).contains(&key_len) {
        return Err(CliError::Validation {
            field: "key".into(),
            reason: format!("{security_mode} needs a key of 8 to 63 characters, got {key_len}"),
        });
    }
    if args.ssid.trim().is_empty() {
        return Err(CliError::Validation {
            field: "ssid".into(),
            reason: "network name cannot be empty".into(),
        });
    }

    Ok(GuestWifiConfig {
        security_mode,
        activate_push_service: args.push_service,
        limit_web_access: !args.full_web_access,
        allow_client_communication: args.client_communication,
        ..GuestWifiConfig::new(args.ssid, args.key)
    })
}

pub async fn handle(ctx: &Ctx, args: GuestWifiArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GuestWifiCommand::On(on) => {
            let config = build_config(on)?;
            ctx.session
                .turn_on_guest_wifi(&config)
                .await
                .map_err(|e| ctx.api_err(e))?;
            output::print_success(
                global,
                &format!("Guest WiFi '{}' enabled ({})", config.ssid, config.security_mode),
            );
            Ok(())
        }
        GuestWifiCommand::Off => {
            ctx.session
                .turn_off_guest_wifi()
                .await
                .map_err(|e| ctx.api_err(e))?;
            output::print_success(global, "Guest WiFi disabled");
            Ok(())
        }
    }
}
