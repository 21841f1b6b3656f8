//! Call list records parsed from `fon_num/foncalls_list.lua?csv=`.
//!
//! The export is semicolon separated, optionally preceded by a `sep=;`
//! hint line, with a German header row:
//!
//! ```text
//! sep=;
//! Typ;Datum;Name;Rufnummer;Nebenstelle;Eigene Rufnummer;Dauer
//! 1;17.10.26 09:15;Erika Mustermann;0301234567;Telefon;SIP: 987654;0:03
//! ```
//!
//! Columns are located by header name so firmware that inserts extra
//! columns still parses.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Error;

const DATE_FORMAT: &str = "%d.%m.%y %H:%M";

/// Direction / outcome of a call as reported in the `Typ` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum CallKind {
    Incoming,
    Missed,
    Outgoing,
    ActiveIncoming,
    Rejected,
    ActiveOutgoing,
    /// A code this client doesn't know about.
    Other(u8),
}

impl From<u8> for CallKind {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Incoming,
            2 => Self::Missed,
            3 => Self::Outgoing,
            9 => Self::ActiveIncoming,
            10 => Self::Rejected,
            11 => Self::ActiveOutgoing,
            other => Self::Other(other),
        }
    }
}

/// One row of the call list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub kind: CallKind,
    pub date: NaiveDateTime,
    /// Phone book name of the other party, empty when unknown.
    pub name: String,
    /// Number of the other party, empty for suppressed caller id.
    pub number: String,
    /// Internal extension (telephone / DECT handset) that handled the call.
    pub extension: String,
    /// Own number the call came in on or went out through.
    pub own_number: String,
    pub duration_minutes: u32,
}

struct Columns {
    kind: usize,
    date: usize,
    name: usize,
    number: usize,
    extension: usize,
    own_number: usize,
    duration: usize,
}

impl Columns {
    fn from_header(header: &str) -> Option<Self> {
        let names: Vec<&str> = header.split(';').map(str::trim).collect();
        let find = |wanted: &str| names.iter().position(|n| *n == wanted);
        Some(Self {
            kind: find("Typ")?,
            date: find("Datum")?,
            name: find("Name")?,
            number: find("Rufnummer")?,
            extension: find("Nebenstelle")?,
            own_number: find("Eigene Rufnummer")?,
            duration: find("Dauer")?,
        })
    }
}

/// Parse the CSV export of the call list.
pub fn parse_call_list(body: &str) -> Result<Vec<CallRecord>, Error> {
    let mut lines = body
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty() && !l.starts_with("sep="));

    let columns = lines
        .next()
        .and_then(Columns::from_header)
        .ok_or_else(|| Error::extraction("call list header row not found", body))?;

    lines
        .map(|line| parse_row(line, &columns))
        .collect::<Result<Vec<_>, _>>()
}

fn parse_row(line: &str, columns: &Columns) -> Result<CallRecord, Error> {
    let fields: Vec<&str> = line.split(';').collect();
    let field = |idx: usize| {
        fields
            .get(idx)
            .map(|f| f.trim())
            .ok_or_else(|| Error::extraction(format!("call list row has no column {idx}"), line))
    };

    let kind = field(columns.kind)?
        .parse::<u8>()
        .map_err(|e| Error::extraction(format!("invalid call type: {e}"), line))?;
    let date = NaiveDateTime::parse_from_str(field(columns.date)?, DATE_FORMAT)
        .map_err(|e| Error::extraction(format!("invalid call date: {e}"), line))?;
    let duration_minutes = parse_duration(field(columns.duration)?)
        .ok_or_else(|| Error::extraction("invalid call duration", line))?;

    Ok(CallRecord {
        kind: CallKind::from(kind),
        date,
        name: field(columns.name)?.to_owned(),
        number: field(columns.number)?.to_owned(),
        extension: field(columns.extension)?.to_owned(),
        own_number: field(columns.own_number)?.to_owned(),
        duration_minutes,
    })
}

/// `h:mm` → minutes. Missed calls carry an empty duration.
fn parse_duration(s: &str) -> Option<u32> {
    if s.is_empty() {
        return Some(0);
    }
    let (hours, minutes) = s.split_once(':')?;
    let hours = hours.parse::<u32>().ok()?;
    let minutes = minutes.parse::<u32>().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}
