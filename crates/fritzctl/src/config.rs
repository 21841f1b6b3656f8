//! CLI configuration: thin wrapper around `fritzctl_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --address, --password, --timeout).

use std::io::IsTerminal;

use clap::ValueEnum;
use secrecy::SecretString;

use fritzctl_api::ConnectorConfig;
use fritzctl_config::ConfigError;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fritzctl_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_password,
};

/// Everything needed to reach one device.
#[derive(Debug)]
pub struct Device {
    pub profile_name: String,
    pub profile: Profile,
    pub connector: ConnectorConfig,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: flag, then `defaults.output`, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Pick the profile and apply flag overrides on top of it.
///
/// An explicitly requested profile must exist. Without one, a missing
/// default profile falls back to built-in defaults (`fritz.box`).
pub fn resolve_device(global: &GlobalOpts, config: &Config) -> Result<Device, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => Profile::default(),
    };

    if let Some(ref address) = global.address {
        profile.address.clone_from(address);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let connector = fritzctl_config::profile_to_connector_config(&profile, &config.defaults)?;
    Ok(Device {
        profile_name,
        profile,
        connector,
    })
}

/// Resolve the device password: `--password` first, then the shared
/// credential chain, then an interactive prompt when stdin is a terminal.
pub fn resolve_password(global: &GlobalOpts, device: &Device) -> Result<SecretString, CliError> {
    if let Some(ref password) = global.password {
        return Ok(SecretString::from(password.clone()));
    }

    match fritzctl_config::resolve_password(&device.profile, &device.profile_name) {
        Ok(password) => Ok(password),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            prompt_password(&device.profile_name)
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt_password(profile_name: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(format!("Password for '{profile_name}': "))?;
    if password.is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    Ok(SecretString::from(password))
}
