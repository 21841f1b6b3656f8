// Text extraction from device responses.
//
// The FRITZ!Box web UI has no structured API for the values we need, so
// they are scraped out of XML/HTML fragments between fixed markers. Keeping
// the markers here isolates the protocol code from markup changes.

use crate::error::Error;

/// A pair of literal strings enclosing a value in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

/// `<Challenge>…</Challenge>` in `login_sid.lua`.
pub const CHALLENGE: Marker = Marker {
    name: "challenge",
    start: "<Challenge>",
    end: "</Challenge>",
};

/// `<SID>…</SID>` in `login_sid.lua`.
pub const SID: Marker = Marker {
    name: "session id",
    start: "<SID>",
    end: "</SID>",
};

/// Public IP line on `internet/inetstat_monitor.lua`.
pub const INTERNET_IP: Marker = Marker {
    name: "internet IP",
    start: "IP-Adresse: ",
    end: "</span></div></td></tr><tr>",
};

/// Return the text between the first occurrence of `marker.start` and the
/// next occurrence of `marker.end` after it.
pub fn between<'a>(body: &'a str, marker: &Marker) -> Result<&'a str, Error> {
    let Some(from) = body.find(marker.start) else {
        return Err(Error::extraction(
            format!("{} start marker {:?} not found", marker.name, marker.start),
            body,
        ));
    };
    let rest = &body[from + marker.start.len()..];
    let Some(len) = rest.find(marker.end) else {
        return Err(Error::extraction(
            format!("{} end marker {:?} not found", marker.name, marker.end),
            body,
        ));
    };
    Ok(&rest[..len])
}
