//! Login command handler.

use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Ctx;

#[derive(Serialize)]
struct LoginInfo<'a> {
    address: &'a str,
    sid: &'a str,
}

/// Print the session id so later invocations can pass it via `--sid`.
pub fn handle(ctx: &Ctx, global: &GlobalOpts) -> Result<(), CliError> {
    let info = LoginInfo {
        address: ctx.session.address(),
        sid: ctx.session.sid().as_str(),
    };
    let out = output::render_single(
        output::format(global),
        &info,
        |i| format!("Address:  {}\nSID:      {}", i.address, i.sid),
        |i| i.sid.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
