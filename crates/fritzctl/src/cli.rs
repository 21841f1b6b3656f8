//! Clap derive structures for the `fritzctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fritzctl -- control a FRITZ!Box from the command line
#[derive(Debug, Parser)]
#[command(
    name = "fritzctl",
    version,
    about = "Control a FRITZ!Box router from the command line",
    long_about = "Logs in to the FRITZ!Box web interface and drives it:\n\
        guest WiFi, internet reconnect, public IP and the call list.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "FRITZ_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device host name or IP (overrides profile)
    #[arg(long, short = 'a', env = "FRITZ_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Device password
    #[arg(long, env = "FRITZ_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Reuse an existing session id instead of logging in
    #[arg(long, env = "FRITZ_SID", global = true, hide_env_values = true)]
    pub sid: Option<String>,

    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "FRITZ_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FRITZ_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session id
    Login,

    /// Show the public IP address of the internet connection
    Ip,

    /// Drop and re-establish the internet connection
    Reconnect(ReconnectArgs),

    /// Turn the guest WiFi on or off
    #[command(alias = "guest")]
    GuestWifi(GuestWifiArgs),

    /// List recent calls
    Calls(CallsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Reconnect ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReconnectArgs {
    /// Print the new public IP once reconnected
    #[arg(long)]
    pub show_ip: bool,
}

// ── Guest WiFi ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GuestWifiArgs {
    #[command(subcommand)]
    pub command: GuestWifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestWifiCommand {
    /// Enable the guest network
    On(GuestWifiOnArgs),
    /// Disable the guest network
    Off,
}

#[derive(Debug, Args)]
pub struct GuestWifiOnArgs {
    /// Network name
    #[arg(long)]
    pub ssid: String,

    /// Network key (at least 8 characters unless --security none)
    #[arg(long, env = "FRITZ_GUEST_KEY", hide_env_values = true, default_value = "")]
    pub key: String,

    /// Encryption
    #[arg(long, default_value = "wpa2")]
    pub security: SecurityArg,

    /// Notify via push service when guests connect or disconnect
    #[arg(long)]
    pub push_service: bool,

    /// Allow guests more than web browsing and mail
    #[arg(long)]
    pub full_web_access: bool,

    /// Allow guest devices to reach each other
    #[arg(long)]
    pub client_communication: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecurityArg {
    /// WPA (TKIP)
    Wpa,
    /// WPA2 (CCMP)
    Wpa2,
    /// WPA + WPA2
    WpaWpa2,
    /// Open network
    None,
}

// ── Calls ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CallsArgs {
    /// Show at most this many calls (newest first)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Only show missed calls
    #[arg(long)]
    pub missed: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,
    /// Show the current configuration (passwords masked)
    Show,
    /// Print the config file path
    Path,
    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
