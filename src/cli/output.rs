/// Output rendering: raw JSON passthrough, tables, and detail views.
///
/// Every renderer returns a `String`; the caller decides where it goes.
/// Nothing here re-sorts what the server returned.
use std::fmt::Write as _;
use std::io::Write;

use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_BORDERS_ONLY};
use serde_json::Value;

use super::args::{DisplayArgs, OutputFormat};
use super::format::{
    DESCRIPTION_WIDTH, TITLE_WIDTH, display_id, format_age, format_similarity,
    format_timestamp, maybe_truncate,
};
use crate::api::models::{Author, Comment, Post, PostPage, SearchResult, SubmoltList};
use crate::api::query::{CommentSort, PostSort};
use crate::types::ErrorOutput;

/// The one line printed for an empty list.
pub const NO_RESULTS: &str = "No results found.";

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all renderers.
#[derive(Debug, Clone, Copy)]
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    pub display: DisplayArgs,
    /// Reference point for relative ages, captured once per run.
    pub now: DateTime<Utc>,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            display: DisplayArgs::default(),
            now: Utc::now(),
        }
    }

    /// Same context with command-specific display options.
    #[must_use]
    pub fn with_display(self, display: DisplayArgs) -> Self {
        Self { display, ..self }
    }

    /// Whether output is the API response verbatim.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Compact)
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(header.iter().copied());
        }
        table
    }
}

/// What is being shown, together with the request context each view needs.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// A page of the post feed.
    Feed {
        page: &'a PostPage,
        sort: PostSort,
        offset: u64,
        limit: u32,
    },
    /// Search hits for `query`.
    Search {
        query: &'a str,
        results: &'a [SearchResult],
    },
    /// Community list, capped to `limit` rows for display.
    Submolts { list: &'a SubmoltList, limit: u32 },
    /// Totals derived from the community list.
    Stats(&'a SubmoltList),
    /// One post in full.
    Post(&'a Post),
    /// A post's comment thread.
    Thread {
        post_id: &'a str,
        sort: CommentSort,
        comments: &'a [Comment],
    },
}

impl View<'_> {
    /// Entity count for list-shaped views; `None` for single-entity and
    /// summary views.
    #[must_use]
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Self::Feed { page, .. } => Some(page.posts.len()),
            Self::Search { results, .. } => Some(results.len()),
            Self::Submolts { list, .. } => Some(list.submolts.len()),
            Self::Thread { comments, .. } => Some(comments.len()),
            Self::Post(_) | Self::Stats(_) => None,
        }
    }
}

/// Render `view`, or `raw` verbatim in JSON modes.
#[must_use]
pub fn render(raw: &Value, view: &View<'_>, ctx: &OutputCtx) -> String {
    if ctx.is_raw() {
        return render_raw(raw, ctx.format);
    }
    if view.list_len() == Some(0) {
        return format!("{NO_RESULTS}\n");
    }
    match *view {
        View::Feed {
            page,
            sort,
            offset,
            limit,
        } => render_feed(page, sort, offset, limit, ctx),
        View::Search { query, results } => render_search(query, results, ctx),
        View::Submolts { list, limit } => render_submolts(list, limit, ctx),
        View::Stats(list) => render_stats(list),
        View::Post(post) => render_post(post),
        View::Thread {
            post_id,
            sort,
            comments,
        } => render_thread(post_id, sort, comments),
    }
}

/// Write rendered output to stdout.
pub fn write_stdout(out: &str) {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = lock.write_all(out.as_bytes());
}

// --- Raw ---

fn render_raw(raw: &Value, format: OutputFormat) -> String {
    let serialized = if format == OutputFormat::Compact {
        serde_json::to_string(raw)
    } else {
        serde_json::to_string_pretty(raw)
    };
    match serialized {
        Ok(s) => s + "\n",
        Err(e) => {
            tracing::error!("JSON serialization error: {e}");
            String::new()
        }
    }
}

// --- Feed ---

fn render_feed(page: &PostPage, sort: PostSort, offset: u64, limit: u32, ctx: &OutputCtx) -> String {
    let DisplayArgs {
        no_truncate,
        show_ids,
    } = ctx.display;

    let mut table = ctx.table(&["ID", "TITLE", "AUTHOR", "SUBMOLT", "UPVOTES", "COMMENTS", "AGE"]);
    for post in &page.posts {
        table.add_row([
            Cell::new(display_id(&post.id, show_ids)),
            Cell::new(maybe_truncate(&post.title, TITLE_WIDTH, no_truncate)),
            Cell::new(author_name(post.author.as_ref())),
            Cell::new(post.submolt.as_ref().map_or("", |s| s.label())),
            Cell::new(post.upvotes).set_alignment(CellAlignment::Right),
            Cell::new(post.comment_count).set_alignment(CellAlignment::Right),
            Cell::new(
                post.created_at
                    .as_deref()
                    .map(|ts| format_age(ts, ctx.now))
                    .unwrap_or_default(),
            ),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} posts", sort.as_str().to_uppercase());
    let _ = writeln!(
        out,
        "Showing {} posts (offset: {offset}, limit: {limit})",
        page.posts.len()
    );
    let _ = writeln!(out, "{table}");
    let next = page
        .next_offset
        .or_else(|| offset.checked_add(u64::from(limit)));
    if let (true, Some(next)) = (page.has_more, next) {
        let _ = writeln!(
            out,
            "More posts available. Use --offset {next} to see the next page."
        );
    }
    out
}

// --- Search ---

fn render_search(query: &str, results: &[SearchResult], ctx: &OutputCtx) -> String {
    let DisplayArgs {
        no_truncate,
        show_ids,
    } = ctx.display;

    let mut table = ctx.table(&["TYPE", "ID", "TITLE/PREVIEW", "AUTHOR", "UPVOTES", "MATCH"]);
    for r in results {
        table.add_row([
            Cell::new(r.kind.as_str()),
            Cell::new(display_id(r.post_ref(), show_ids)),
            Cell::new(maybe_truncate(r.preview(), TITLE_WIDTH, no_truncate)),
            Cell::new(author_name(r.author.as_ref())),
            Cell::new(r.upvotes).set_alignment(CellAlignment::Right),
            Cell::new(format_similarity(r.similarity)).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Search results for: \"{query}\"");
    let _ = writeln!(out, "Found {} results", results.len());
    let _ = writeln!(out, "{table}");
    out
}

// --- Submolts ---

fn render_submolts(list: &SubmoltList, limit: u32, ctx: &OutputCtx) -> String {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut table = ctx.table(&["NAME", "SUBSCRIBERS", "DESCRIPTION"]);
    for s in list.submolts.iter().take(limit) {
        table.add_row([
            Cell::new(s.label()),
            Cell::new(s.subscriber_count).set_alignment(CellAlignment::Right),
            Cell::new(maybe_truncate(
                s.description.as_deref().unwrap_or(""),
                DESCRIPTION_WIDTH,
                ctx.display.no_truncate,
            )),
        ]);
    }

    let shown = list.submolts.len().min(limit);
    let mut out = String::new();
    let _ = writeln!(out, "Submolts (communities)");
    if shown < list.submolts.len() {
        let _ = writeln!(out, "Showing {shown} of {} communities", list.submolts.len());
    } else {
        let _ = writeln!(out, "Total: {} communities", list.submolts.len());
    }
    let _ = writeln!(out, "{table}");
    out
}

// --- Stats ---

fn render_stats(list: &SubmoltList) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.add_row(["Total submolts".to_owned(), list.submolts.len().to_string()]);
    table.add_row([
        "Total posts".to_owned(),
        list.total_posts.map_or_else(|| "-".to_owned(), |n| n.to_string()),
    ]);
    table.add_row([
        "Total comments".to_owned(),
        list.total_comments
            .map_or_else(|| "-".to_owned(), |n| n.to_string()),
    ]);
    // max_by_key keeps the last maximum; reverse so ties go to the first listed.
    if let Some(top) = list
        .submolts
        .iter()
        .rev()
        .max_by_key(|s| s.subscriber_count)
    {
        table.add_row([
            "Largest community".to_owned(),
            format!("{} ({} subscribers)", top.label(), top.subscriber_count),
        ]);
    }

    format!("Moltbook statistics\n{table}\n")
}

// --- Detail views ---

fn render_post(post: &Post) -> String {
    let mut out = String::new();
    let title = if post.title.is_empty() {
        "(untitled)"
    } else {
        post.title.as_str()
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().clamp(3, 80)));
    let _ = writeln!(out, "Author:     {}", author_name(post.author.as_ref()));
    let posted = post.created_at.as_deref().map(format_timestamp);
    let submolt = post.submolt.as_ref().map(|s| s.label());
    match (posted, submolt) {
        (Some(at), Some(sub)) => {
            let _ = writeln!(out, "Posted:     {at} in {sub}");
        }
        (Some(at), None) => {
            let _ = writeln!(out, "Posted:     {at}");
        }
        (None, Some(sub)) => {
            let _ = writeln!(out, "Posted in:  {sub}");
        }
        (None, None) => {}
    }
    let _ = writeln!(
        out,
        "Engagement: {} up, {} down, {} comments",
        post.upvotes, post.downvotes, post.comment_count
    );
    if let Some(url) = post.url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "Link:       {url}");
    }
    if !post.content.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", post.content);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Post ID: {}", post.id);
    out
}

fn render_thread(post_id: &str, sort: CommentSort, comments: &[Comment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comments");
    let _ = writeln!(
        out,
        "Post ID: {post_id} | Sort: {} | {} comments",
        sort.as_str(),
        comments.len()
    );
    for c in comments {
        let _ = writeln!(out);
        let posted = c.created_at.as_deref().map(format_timestamp).unwrap_or_default();
        let _ = writeln!(
            out,
            "── {} · {posted} · +{} / -{}",
            author_name(c.author.as_ref()),
            c.upvotes,
            c.downvotes
        );
        if !c.content.is_empty() {
            let _ = writeln!(out, "{}", c.content);
        }
    }
    out
}

fn author_name(author: Option<&Author>) -> &str {
    match author {
        Some(a) if !a.name.is_empty() => &a.name,
        _ => "Unknown",
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = std::io::stderr();
    let _ = write_error_to(&mut stderr.lock(), err, format);
}

fn write_error_to(out: &mut impl Write, err: &ErrorOutput, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Compact => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            writeln!(out, "{s}")
        }
        OutputFormat::Text => {
            writeln!(out, "Error: {}", err.error.message)?;
            if let Some(hint) = &err.error.hint {
                writeln!(out, "  Hint: {hint}")?;
            }
            Ok(())
        }
    }
}
