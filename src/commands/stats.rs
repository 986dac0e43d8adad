/// `stats` command: site-wide totals, derived from the submolt listing.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::output::{View, render};

/// Run `moltbook stats`.
///
/// # Errors
///
/// Returns `ApiError` on any request failure.
pub fn run<T: Transport, S: Sleeper>(
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    let fetched = client.list_submolts()?;
    Ok(render(&fetched.raw, &View::Stats(&fetched.data), ctx))
}
