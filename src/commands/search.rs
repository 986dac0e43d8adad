/// `search` command: semantic search over posts and comments.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::args::SearchArgs;
use crate::cli::output::{View, render};

/// Run `moltbook search`.
///
/// # Errors
///
/// Returns `ApiError` on a bad limit or empty query, or any request failure.
pub fn run<T: Transport, S: Sleeper>(
    args: &SearchArgs,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    let fetched = client.search(&args.query, args.limit, args.kind)?;
    let ctx = ctx.with_display(args.display);
    let view = View::Search {
        query: &args.query,
        results: &fetched.data,
    };
    Ok(render(&fetched.raw, &view, &ctx))
}
