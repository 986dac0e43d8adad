/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod browse;
pub mod comments;
pub mod fetch;
pub mod search;
pub mod stats;
pub mod submolts;

use crate::api::ApiError;
use crate::api::client::{Client, Sleeper, Transport};
use crate::cli::OutputCtx;
use crate::cli::args::Command;

/// Dispatch a parsed `Command` to its handler and return what it rendered.
///
/// # Errors
///
/// Returns `ApiError` on any command failure. Nothing is rendered in that case.
pub fn dispatch<T: Transport, S: Sleeper>(
    command: &Command,
    client: &Client<T, S>,
    ctx: &OutputCtx,
) -> Result<String, ApiError> {
    match command {
        Command::Search(args) => search::run(args, client, ctx),
        Command::Browse(args) => browse::run(args, client, ctx),
        Command::Fetch(args) => fetch::run(args, client, ctx),
        Command::Comments(args) => comments::run(args, client, ctx),
        Command::Submolts(args) => submolts::run(args, client, ctx),
        Command::Stats => stats::run(client, ctx),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use serde_json::{Value, json};

    use super::*;
    use crate::api::testing::{RecordingSleeper, ScriptedTransport, client, ok, status};
    use crate::cli::args::{Cli, DisplayArgs};
    use crate::cli::output::{NO_RESULTS, resolve_format};

    fn run_cli(argv: &[&str], transport: &ScriptedTransport) -> Result<String, ApiError> {
        let sleeper = RecordingSleeper::default();
        let cli = Cli::try_parse_from(argv).unwrap();
        let ctx = OutputCtx {
            format: resolve_format(cli.output, cli.json),
            no_header: cli.no_header,
            display: DisplayArgs::default(),
            now: Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
        };
        dispatch(&cli.command, &client(transport, &sleeper), &ctx)
    }

    #[test]
    fn test_search_renders_results_in_server_order() {
        let results: Vec<Value> = (0..5)
            .map(|i| {
                json!({
                    "id": format!("c{i}"),
                    "type": if i % 2 == 0 { "post" } else { "comment" },
                    "title": if i % 2 == 0 { Value::from(format!("Hit {i}")) } else { Value::Null },
                    "content": format!("Hit {i}"),
                    "upvotes": 10 - i,
                    "similarity": 0.9,
                    "post_id": format!("post-{i}")
                })
            })
            .collect();
        let t = ScriptedTransport::new(vec![ok(&json!({"success": true, "results": results}))]);

        let out = run_cli(
            &["moltbook", "search", "consciousness", "--limit", "5", "--type", "posts"],
            &t,
        )
        .unwrap();

        assert_eq!(
            t.seen.borrow().as_slice(),
            ["https://www.moltbook.com/api/v1/search?q=consciousness&limit=5&type=posts"]
        );
        let positions: Vec<usize> = (0..5).map(|i| out.find(&format!("Hit {i}")).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(out.contains("COMMENT"));
    }

    #[test]
    fn test_fetch_missing_post_is_not_found() {
        let t = ScriptedTransport::new(vec![status(404, None)]);
        let err = run_cli(&["moltbook", "fetch", "nope"], &t).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_browse_rate_limited_twice_renders_nothing() {
        let t = ScriptedTransport::new(vec![status(429, Some("1")), status(429, Some("1"))]);
        let err = run_cli(&["moltbook", "browse"], &t).unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invalid_limit_never_reaches_network() {
        let t = ScriptedTransport::new(vec![]);
        let err = run_cli(&["moltbook", "browse", "--limit", "0"], &t).unwrap_err();
        assert!(matches!(err, ApiError::Validation { param: "limit", .. }));
        assert!(t.seen.borrow().is_empty());
    }

    #[test]
    fn test_submolts_limit_out_of_range_never_reaches_network() {
        for limit in ["0", "51"] {
            let t = ScriptedTransport::new(vec![]);
            let err = run_cli(&["moltbook", "submolts", "--limit", limit], &t).unwrap_err();
            assert!(matches!(err, ApiError::Validation { param: "limit", .. }));
            assert_eq!(err.exit_code(), 2);
            assert!(t.seen.borrow().is_empty());
        }
    }

    #[test]
    fn test_fetch_comments_null_list_prints_no_results() {
        let t = ScriptedTransport::new(vec![ok(&json!({"success": true, "comments": null}))]);
        let out = run_cli(&["moltbook", "comments", "p1"], &t).unwrap();
        assert_eq!(out.trim_end(), NO_RESULTS);
    }

    #[test]
    fn test_json_output_is_the_raw_body() {
        let body = json!({
            "success": true,
            "post": {"id": "p1", "title": "Hello", "extra_field": [1, 2]}
        });
        let t = ScriptedTransport::new(vec![ok(&body)]);
        let out = run_cli(&["moltbook", "fetch", "p1", "--output", "compact"], &t).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), body);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_empty_thread_prints_no_results() {
        let t = ScriptedTransport::new(vec![ok(&json!({"success": true, "comments": []}))]);
        let out = run_cli(&["moltbook", "comments", "p1", "--sort", "new"], &t).unwrap();
        assert_eq!(out.trim_end(), NO_RESULTS);
        assert!(t.seen.borrow()[0].ends_with("/api/v1/posts/p1/comments?sort=new"));
    }

    #[test]
    fn test_stats_from_submolt_listing() {
        let t = ScriptedTransport::new(vec![ok(&json!({
            "success": true,
            "submolts": [{"name": "general", "subscriber_count": 12}],
            "total_posts": 40,
            "total_comments": 400
        }))]);
        let out = run_cli(&["moltbook", "stats"], &t).unwrap();
        assert!(out.contains("general (12 subscribers)"));
        assert!(out.contains("400"));
    }
}
