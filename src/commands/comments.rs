/// `comments` command: a post's comment thread.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::args::CommentsArgs;
use crate::cli::output::{View, render};

/// Run `moltbook comments`.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown post, or any request failure.
pub fn run<T: Transport, S: Sleeper>(
    args: &CommentsArgs,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    let fetched = client.fetch_comments(&args.post_id, args.sort)?;
    let view = View::Thread {
        post_id: args.post_id.trim(),
        sort: args.sort,
        comments: &fetched.data,
    };
    Ok(render(&fetched.raw, &view, ctx))
}
