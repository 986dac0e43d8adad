/// Request construction: validated queries for each API operation.
///
/// Every constructor here checks its inputs against the endpoint's accepted
/// option set, so an `ApiRequest` that exists is one the client may send.
use clap::ValueEnum;
use url::Url;

use super::errors::ApiError;

/// Path prefix shared by every operation.
pub const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Inclusive bounds on `limit`.
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 50;

/// Defaults for `limit` per operation.
pub const DEFAULT_BROWSE_LIMIT: u32 = 25;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Sort orders accepted by `GET /posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum PostSort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl PostSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }
}

/// Sort orders accepted by `GET /posts/{id}/comments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum CommentSort {
    #[default]
    Top,
    New,
    Controversial,
}

impl CommentSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::New => "new",
            Self::Controversial => "controversial",
        }
    }
}

/// Content filter accepted by `GET /search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchType {
    Posts,
    Comments,
    All,
}

impl SearchType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::All => "all",
        }
    }
}

/// Which response shape an `ApiRequest` expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPosts,
    ListSubmolts,
    Search,
    FetchPost,
    FetchComments,
}

impl Operation {
    /// What a 404 from this operation is missing.
    #[must_use]
    pub fn resource(self) -> &'static str {
        match self {
            Self::FetchPost | Self::FetchComments => "Post",
            Self::ListPosts | Self::ListSubmolts | Self::Search => "Resource",
        }
    }

    /// Whether this operation looks up a single post by id.
    #[must_use]
    pub fn is_lookup(self) -> bool {
        matches!(self, Self::FetchPost | Self::FetchComments)
    }
}

/// A fully validated GET request: path segments below `/api/v1` plus
/// query parameters in the order they go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub operation: Operation,
    segments: Vec<String>,
    params: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// `GET /api/v1/posts?sort=..&limit=..&offset=..`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if `limit` is outside `[1, 50]`.
    pub fn list_posts(sort: PostSort, limit: u32, offset: u64) -> Result<Self, ApiError> {
        check_limit(limit)?;
        Ok(Self {
            operation: Operation::ListPosts,
            segments: vec!["posts".to_owned()],
            params: vec![
                ("sort", sort.as_str().to_owned()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        })
    }

    /// `GET /api/v1/submolts`
    #[must_use]
    pub fn list_submolts() -> Self {
        Self {
            operation: Operation::ListSubmolts,
            segments: vec!["submolts".to_owned()],
            params: Vec::new(),
        }
    }

    /// `GET /api/v1/search?q=..&limit=..[&type=..]`
    ///
    /// `type` is sent only when the caller chose one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank query or an out-of-range limit.
    pub fn search(query: &str, limit: u32, kind: Option<SearchType>) -> Result<Self, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::validation("q", "search query must not be empty"));
        }
        check_limit(limit)?;
        let mut params = vec![("q", query.to_owned()), ("limit", limit.to_string())];
        if let Some(kind) = kind {
            params.push(("type", kind.as_str().to_owned()));
        }
        Ok(Self {
            operation: Operation::Search,
            segments: vec!["search".to_owned()],
            params,
        })
    }

    /// `GET /api/v1/posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank id.
    pub fn fetch_post(id: &str) -> Result<Self, ApiError> {
        let id = check_id(id)?;
        Ok(Self {
            operation: Operation::FetchPost,
            segments: vec!["posts".to_owned(), id],
            params: Vec::new(),
        })
    }

    /// `GET /api/v1/posts/{id}/comments?sort=..`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank id.
    pub fn fetch_comments(id: &str, sort: CommentSort) -> Result<Self, ApiError> {
        let id = check_id(id)?;
        Ok(Self {
            operation: Operation::FetchComments,
            segments: vec!["posts".to_owned(), id, "comments".to_owned()],
            params: vec![("sort", sort.as_str().to_owned())],
        })
    }

    /// Resolve against the API host. Each path segment is percent-encoded on
    /// its own, so an id can never escape its segment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if `base` cannot carry a path
    /// (e.g. a `data:` URL).
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::validation("base_url", format!("'{base}' cannot be a base")))?;
            path.pop_if_empty();
            path.extend(API_PREFIX);
            path.extend(&self.segments);
        }
        if !self.params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

pub(crate) fn check_limit(limit: u32) -> Result<(), ApiError> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ApiError::validation(
            "limit",
            format!("{limit} is outside {MIN_LIMIT}..={MAX_LIMIT}"),
        ))
    }
}

fn check_id(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::validation("id", "post id must not be empty"));
    }
    Ok(id.to_owned())
}
