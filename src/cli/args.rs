/// CLI argument definitions via clap derive.
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::query::{
    CommentSort, DEFAULT_BROWSE_LIMIT, DEFAULT_SEARCH_LIMIT, MAX_LIMIT, PostSort, SearchType,
};

/// moltbook — read and search Moltbook from the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "moltbook",
    about = "Read and search Moltbook, the social network for AI agents",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Shorthand for --output json (raw API response).
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Log requests, retries, and timings to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Tables for lists, a detail view for single posts and threads.
    #[default]
    Text,
    /// The API response, pretty-printed.
    Json,
    /// The API response on one line.
    Compact,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Semantic search over posts and comments.
    Search(SearchArgs),
    /// Browse the post feed.
    Browse(BrowseArgs),
    /// Show one post in full.
    Fetch(FetchArgs),
    /// Show the comment thread of a post.
    Comments(CommentsArgs),
    /// List submolts (communities).
    Submolts(SubmoltsArgs),
    /// Show site-wide totals.
    Stats,
}

/// Display options shared by the list commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DisplayArgs {
    /// Show full text instead of cutting long cells.
    #[arg(long)]
    pub no_truncate: bool,

    /// Show full ids instead of abbreviating them.
    #[arg(long)]
    pub show_ids: bool,
}

/// Arguments for `moltbook search`.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// What to search for (matched by meaning, not keywords).
    pub query: String,

    /// Number of results (1-50).
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: u32,

    /// Restrict results to one content type.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: Option<SearchType>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

/// Arguments for `moltbook browse`.
#[derive(Debug, Parser)]
pub struct BrowseArgs {
    /// Feed ordering.
    #[arg(short, long, value_name = "SORT", default_value = "hot")]
    pub sort: PostSort,

    /// Number of posts (1-50).
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_BROWSE_LIMIT)]
    pub limit: u32,

    /// Number of posts to skip, for paging.
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub offset: u64,

    #[command(flatten)]
    pub display: DisplayArgs,
}

/// Arguments for `moltbook fetch`.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Post id.
    pub post_id: String,
}

/// Arguments for `moltbook comments`.
#[derive(Debug, Parser)]
pub struct CommentsArgs {
    /// Post id.
    pub post_id: String,

    /// Thread ordering.
    #[arg(short, long, value_name = "SORT", default_value = "top")]
    pub sort: CommentSort,
}

/// Arguments for `moltbook submolts`.
#[derive(Debug, Parser)]
pub struct SubmoltsArgs {
    /// Maximum number of submolts to show (1-50).
    #[arg(short, long, value_name = "N", default_value_t = MAX_LIMIT)]
    pub limit: u32,

    /// Show full descriptions.
    #[arg(long)]
    pub no_truncate: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "moltbook",
            "search",
            "consciousness",
            "--limit",
            "5",
            "--type",
            "posts",
            "--show-ids",
        ])
        .unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, "consciousness");
        assert_eq!(args.limit, 5);
        assert_eq!(args.kind, Some(SearchType::Posts));
        assert!(args.display.show_ids);
        assert!(!args.display.no_truncate);
    }

    #[test]
    fn test_browse_defaults() {
        let cli = Cli::try_parse_from(["moltbook", "browse"]).unwrap();
        let Command::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.sort, PostSort::Hot);
        assert_eq!(args.limit, 25);
        assert_eq!(args.offset, 0);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(Cli::try_parse_from(["moltbook", "browse", "--sort", "best"]).is_err());
        assert!(Cli::try_parse_from(["moltbook", "comments", "p1", "--sort", "hot"]).is_err());
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["moltbook", "fetch", "p1", "--json"]).unwrap();
        assert!(cli.json);
        assert!(
            Cli::try_parse_from(["moltbook", "--json", "--output", "compact", "stats"]).is_err()
        );
    }
}
