//! Internet connection handlers: public IP and reconnect.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{GlobalOpts, ReconnectArgs};
use crate::error::CliError;
use crate::output;

use super::Ctx;

#[derive(Serialize)]
struct InternetIp {
    ip: String,
}

pub async fn ip(ctx: &Ctx, global: &GlobalOpts) -> Result<(), CliError> {
    let ip = ctx
        .session
        .internet_ip()
        .await
        .map_err(|e| ctx.api_err(e))?;
    print_ip(&InternetIp { ip }, global)
}

pub async fn reconnect(ctx: &Ctx, args: ReconnectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = spinner(global);
    spinner.set_message(format!("Reconnecting {} to the internet...", ctx.session.address()));

    // Ctrl-C during the wait only shortens the settle delay.
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, skipping settle delay");
                cancel.cancel();
            }
        }
    });

    let result = ctx.session.reconnect_to_internet_until(&cancel).await;
    watcher.abort();
    spinner.finish_and_clear();
    result.map_err(|e| ctx.api_err(e))?;

    output::print_success(global, "Internet connection re-established");

    if args.show_ip {
        return ip(ctx, global).await;
    }
    Ok(())
}

fn print_ip(ip: &InternetIp, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(
        output::format(global),
        ip,
        |i| i.ip.clone(),
        |i| i.ip.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn spinner(global: &GlobalOpts) -> ProgressBar {
    if global.quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} {elapsed}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
