//! Call list command handler.

use fritzctl_api::{CallKind, CallRecord};
use tabled::Tabled;

use crate::cli::{CallsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::Ctx;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CallRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Extension")]
    extension: String,
    #[tabled(rename = "Own number")]
    own_number: String,
    #[tabled(rename = "Min")]
    minutes: u32,
}

impl From<&CallRecord> for CallRow {
    fn from(c: &CallRecord) -> Self {
        Self {
            kind: c.kind.to_string(),
            date: c.date.format("%Y-%m-%d %H:%M").to_string(),
            name: c.name.clone(),
            number: c.number.clone(),
            extension: c.extension.clone(),
            own_number: c.own_number.clone(),
            minutes: c.duration_minutes,
        }
    }
}

fn plain_line(c: &CallRecord) -> String {
    format!(
        "{}\t{}\t{}",
        c.date.format("%Y-%m-%d %H:%M"),
        c.kind,
        if c.number.is_empty() { "-" } else { &c.number }
    )
}

/// Apply `--missed` and `--limit`. The device lists newest calls first.
fn select(mut calls: Vec<CallRecord>, args: &CallsArgs) -> Vec<CallRecord> {
    if args.missed {
        calls.retain(|c| c.kind == CallKind::Missed);
    }
    if let Some(limit) = args.limit {
        calls.truncate(limit);
    }
    calls
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx, args: CallsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let calls = ctx
        .session
        .call_list()
        .await
        .map_err(|e| ctx.api_err(e))?;
    let calls = select(calls, &args);

    let out = output::render_list(
        output::format(global),
        &calls,
        |c| CallRow::from(c),
        |c| plain_line(c),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn call(kind: CallKind, number: &str) -> CallRecord {
        CallRecord {
            kind,
            date: NaiveDate::from_ymd_opt(2026, 10, 17)
                .and_then(|d| d.and_hms_opt(9, 15, 0))
                .unwrap_or_default(),
            name: String::new(),
            number: number.into(),
            extension: "Telefon".into(),
            own_number: "987654".into(),
            duration_minutes: 3,
        }
    }

    fn list() -> Vec<CallRecord> {
        vec![
            call(CallKind::Missed, "0301"),
            call(CallKind::Incoming, "0302"),
            call(CallKind::Missed, "0303"),
        ]
    }

    #[test]
    fn missed_filter_runs_before_limit() {
        let args = CallsArgs {
            limit: Some(1),
            missed: true,
        };
        let selected = select(list(), &args);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].number, "0301");
    }

    #[test]
    fn plain_line_marks_suppressed_numbers() {
        assert_eq!(
            plain_line(&call(CallKind::Incoming, "")),
            "2026-10-17 09:15\tincoming\t-"
        );
    }
}
