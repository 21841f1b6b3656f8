//! Guest WiFi settings for `wlan/guest_access.lua`.

use url::form_urlencoded;

/// Encryption of the guest network, with the code the device expects in
/// the `sec_mode` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SecurityMode {
    /// WPA (TKIP)
    Wpa,
    /// WPA2 (CCMP)
    Wpa2,
    /// WPA + WPA2
    WpaWpa2,
    /// Open network
    None,
}

impl SecurityMode {
    /// The numeric `sec_mode` value.
    pub fn code(self) -> u8 {
        match self {
            Self::Wpa => 2,
            Self::Wpa2 => 3,
            Self::WpaWpa2 => 4,
            Self::None => 5,
        }
    }
}

/// Settings sent when turning the guest network on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestWifiConfig {
    pub ssid: String,
    pub security_mode: SecurityMode,
    /// Network key. Ignored by the device when `security_mode` is `None`.
    pub password: String,
    /// Push notification on guest connect / disconnect (needs the push
    /// service set up on the device).
    pub activate_push_service: bool,
    /// Restrict guests to web browsing and mail.
    pub limit_web_access: bool,
    /// Let guest clients reach each other.
    pub allow_client_communication: bool,
}

impl GuestWifiConfig {
    /// WPA2 network with web access limited and client isolation on.
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            security_mode: SecurityMode::Wpa2,
            password: password.into(),
            activate_push_service: false,
            limit_web_access: true,
            allow_client_communication: false,
        }
    }

    /// Form body enabling the guest network with these settings.
    ///
    /// Optional flags are only present when set; the device treats a
    /// missing checkbox field as "off".
    pub fn form_body(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("activate_guest_access", "on")
            .append_pair("autoupdate", "on")
            .append_pair("guest_ssid", &self.ssid)
            .append_pair("sec_mode", &self.security_mode.code().to_string())
            .append_pair("wpa_key", &self.password);
        if self.activate_push_service {
            form.append_pair("push_service", "on");
        }
        if self.limit_web_access {
            form.append_pair("group_access", "on");
        }
        if self.allow_client_communication {
            form.append_pair("user_isolation", "on");
        }
        form.finish()
    }
}

/// Form body turning the guest network off.
pub fn disable_form_body() -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("autoupdate", "on")
        .finish()
}
