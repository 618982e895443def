//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

/// A named grouping for articles. Names are unique and at most
/// twenty characters; both constraints live in the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

/// A single published post. `text` is unbounded; `title` is unique and
/// capped at fifty characters, `introduction` at one hundred.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub pub_date: OffsetDateTime,
}
