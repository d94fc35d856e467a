// Contracts for the stores the suggestion engine reads from
// Each trait is a read-only view over one subsystem. `crate::database` holds
// the production implementations and `InMemoryForum` implements all of them.

use anyhow::Result;
use async_trait::async_trait;

use super::model::{Cid, Tid, Topic, TopicFields, Uid};

/// Privilege checked before a topic may be suggested
pub const TOPICS_READ: &str = "topics:read";

/// Sorted set of topics filed under `tag`, scored by creation time
pub fn tag_topics_key(tag: &str) -> String {
    format!("tag:{tag}:topics")
}

/// Sorted set of a category's topics, scored by last post time
pub fn category_recent_key(cid: Cid) -> String {
    format!("cid:{cid}:tids:lastposttime")
}

/// Topic lookups
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Tag names of a topic; empty when the topic is unknown
    async fn topic_tags(&self, tid: Tid) -> Result<Vec<String>>;

    /// Title and category of a topic
    async fn topic_fields(&self, tid: Tid) -> Result<Option<TopicFields>>;

    /// Topic records in the order of `tids`, `None` for unknown ids
    async fn topics_by_tids(&self, tids: &[Tid], uid: Uid) -> Result<Vec<Option<Topic>>>;
}

/// Reverse-ordered range queries over scored topic sets.
///
/// Several keys are read as their union ordered by score, highest first.
/// A topic filed under more than one key appears once per key.
#[async_trait]
pub trait SortedSetIndex: Send + Sync {
    async fn rev_range(&self, keys: &[String], limit: Option<usize>) -> Result<Vec<Tid>>;

    /// Like `rev_range`, restricted to members scored at or above `min_score`
    async fn rev_range_by_score(
        &self,
        keys: &[String],
        limit: Option<usize>,
        min_score: i64,
    ) -> Result<Vec<Tid>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchWords {
    Any,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Newer,
    Older,
}

/// A title search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub match_words: MatchWords,
    pub categories: Vec<Cid>,
    pub uid: Uid,
    /// Seconds; `0` disables the time filter
    pub time_range_secs: u64,
    pub time_filter: TimeFilter,
}

impl SearchQuery {
    pub fn words(&self) -> Vec<String> {
        search_words(&self.query)
    }

    /// Timestamp bound (ms) the time filter compares against, if any
    pub fn time_bound_ms(&self, now_ms: i64) -> Option<i64> {
        if self.time_range_secs == 0 {
            return None;
        }
        let range_ms: i64 = i64::try_from(self.time_range_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        Some(now_ms.saturating_sub(range_ms))
    }
}

/// Lowercased alphanumeric words of `text`
pub fn search_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub tids: Vec<Tid>,
}

#[async_trait]
pub trait TopicSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult>;
}

#[async_trait]
pub trait PrivilegeFilter: Send + Sync {
    /// The subset of `tids` the viewer holds `privilege` on, order preserved
    async fn filter_tids(&self, privilege: &str, tids: Vec<Tid>, uid: Uid) -> Result<Vec<Tid>>;
}

#[async_trait]
pub trait BlockFilter: Send + Sync {
    /// Drops topics authored by users the viewer has blocked
    async fn filter(&self, uid: Uid, topics: Vec<Topic>) -> Result<Vec<Topic>>;
}
