/// `fetch` command: one post in full.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::args::FetchArgs;
use crate::cli::output::{View, render};

/// Run `moltbook fetch`.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown id, or any request failure.
pub fn run<T: Transport, S: Sleeper>(
    args: &FetchArgs,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    let fetched = client.fetch_post(&args.post_id)?;
    Ok(render(&fetched.raw, &View::Post(&fetched.data), ctx))
}
