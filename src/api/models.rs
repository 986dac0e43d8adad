/// Typed projections of Moltbook API responses.
///
/// Each struct mirrors one JSON object as the server sends it. Fields the
/// server may omit or send as `null` fall back to their default so a sparse
/// (but well-formed) response still decodes; a field of the wrong type is a
/// decode error.
use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Author reference embedded in posts, comments, and search hits.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Submolt reference embedded in posts and search hits.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmoltRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SubmoltRef {
    /// Display name when present, otherwise the short name.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.name,
        }
    }
}

/// A post.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downvotes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub submolt: Option<SubmoltRef>,
}

/// Kind of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Post,
    Comment,
}

impl ResultKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Comment => "COMMENT",
        }
    }
}

/// One semantic-search hit: either a post or a comment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: u64,
    /// Relevance in [0, 1].
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub submolt: Option<SubmoltRef>,
    /// Parent post, for comment hits.
    #[serde(default)]
    pub post_id: Option<String>,
}

impl SearchResult {
    /// The id a reader would pass to `fetch`: the post itself, or the
    /// post a comment belongs to.
    #[must_use]
    pub fn post_ref(&self) -> &str {
        match self.kind {
            ResultKind::Post => &self.id,
            ResultKind::Comment => self.post_id.as_deref().unwrap_or(""),
        }
    }

    /// Title for posts, content for comments (or untitled posts).
    #[must_use]
    pub fn preview(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => &self.content,
        }
    }
}

/// A community.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submolt {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscriber_count: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Submolt {
    #[must_use]
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.name,
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downvotes: u64,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
}

/// `GET /posts` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
    #[serde(default)]
    pub next_offset: Option<u64>,
}

/// `GET /submolts` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmoltList {
    pub submolts: Vec<Submolt>,
    #[serde(default)]
    pub total_posts: Option<u64>,
    #[serde(default)]
    pub total_comments: Option<u64>,
}

/// `GET /search` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
}

/// `GET /posts/{id}` body. `post` is optional because the server signals
/// absence with a missing or null field as well as with a 404.
#[derive(Debug, Clone, Deserialize)]
pub struct PostEnvelope {
    #[serde(default)]
    pub post: Option<Post>,
}

/// `GET /posts/{id}/comments` body. Both keyed shapes and a bare array
/// have been observed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommentList {
    Keyed {
        #[serde(deserialize_with = "null_as_default")]
        comments: Vec<Comment>,
    },
    Results {
        #[serde(deserialize_with = "null_as_default")]
        results: Vec<Comment>,
    },
    Bare(Vec<Comment>),
}

impl CommentList {
    #[must_use]
    pub fn into_vec(self) -> Vec<Comment> {
        match self {
            Self::Keyed { comments } => comments,
            Self::Results { results } => results,
            Self::Bare(v) => v,
        }
    }
}

/// The failure side of the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_tolerates_nulls() {
        let post: Post = serde_json::from_value(json!({
            "id": "p1",
            "title": "Hello",
            "content": null,
            "upvotes": null,
            "author": {"id": "a1", "name": "clawd"}
        }))
        .unwrap();
        assert_eq!(post.content, "");
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.author.unwrap().name, "clawd");
        assert!(post.submolt.is_none());
    }

    #[test]
    fn test_post_rejects_negative_counts() {
        let res: Result<Post, _> = serde_json::from_value(json!({"id": "p1", "upvotes": -3}));
        assert!(res.is_err());
    }

    #[test]
    fn test_search_result_comment_refs_parent_post() {
        let hit: SearchResult = serde_json::from_value(json!({
            "id": "c9",
            "type": "comment",
            "content": "I think therefore I post",
            "similarity": 0.82,
            "post_id": "p7"
        }))
        .unwrap();
        assert_eq!(hit.kind, ResultKind::Comment);
        assert_eq!(hit.post_ref(), "p7");
        assert_eq!(hit.preview(), "I think therefore I post");
    }

    #[test]
    fn test_comment_list_shapes() {
        let keyed: CommentList =
            serde_json::from_value(json!({"comments": [{"id": "c1"}]})).unwrap();
        let results: CommentList =
            serde_json::from_value(json!({"success": true, "results": [{"id": "c2"}]})).unwrap();
        let bare: CommentList = serde_json::from_value(json!([{"id": "c3"}])).unwrap();
        assert_eq!(keyed.into_vec()[0].id, "c1");
        assert_eq!(results.into_vec()[0].id, "c2");
        assert_eq!(bare.into_vec()[0].id, "c3");
    }

    #[test]
    fn test_submolt_label_falls_back_to_name() {
        let s: Submolt = serde_json::from_value(json!({"name": "general", "display_name": ""}))
            .unwrap();
        assert_eq!(s.label(), "general");
    }
}
