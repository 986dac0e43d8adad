/// `submolts` command: list communities.
use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::api::query::check_limit;
use crate::cli::OutputCtx;
use crate::cli::args::{DisplayArgs, SubmoltsArgs};
use crate::cli::output::{View, render};

/// Run `moltbook submolts`.
///
/// # Errors
///
/// Returns `ApiError::Validation` for a bad limit, otherwise any request
/// failure.
pub fn run<T: Transport, S: Sleeper>(
    args: &SubmoltsArgs,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    check_limit(args.limit)?;
    let fetched = client.list_submolts()?;
    let ctx = ctx.with_display(DisplayArgs {
        no_truncate: args.no_truncate,
        show_ids: false,
    });
    let view = View::Submolts {
        list: &fetched.data,
        limit: args.limit,
    };
    Ok(render(&fetched.raw, &view, &ctx))
}
