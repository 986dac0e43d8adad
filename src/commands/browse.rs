/// `browse` command: one page of the post feed.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::args::BrowseArgs;
use crate::cli::output::{View, render};

/// Run `moltbook browse`.
///
/// # Errors
///
/// Returns `ApiError` on a bad limit or any request failure.
pub fn run<T: Transport, S: Sleeper>(
    args: &BrowseArgs,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    let fetched = client.list_posts(args.sort, args.limit, args.offset)?;
    let ctx = ctx.with_display(args.display);
    let view = View::Feed {
        page: &fetched.data,
        sort: args.sort,
        offset: args.offset,
        limit: args.limit,
    };
    Ok(render(&fetched.raw, &view, &ctx))
}
