// Suggested topics: related topics to show next to a topic a reader is viewing

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use super::model::{PageWindow, Tid, Topic, TopicFields, Uid};
use super::sources::{
    category_recent_key, tag_topics_key, BlockFilter, MatchWords, PrivilegeFilter, SearchQuery,
    SortedSetIndex, TimeFilter, TopicRepository, TopicSearch, TOPICS_READ,
};

/// Candidates kept from each of the tag and search sources
const MAX_SOURCE_CANDIDATES: usize = 10;
/// Most recent category topics consulted when tags and search come up short
const CATEGORY_CANDIDATES: usize = 10;
/// One day in milliseconds
pub const DEFAULT_CUTOFF_UNIT_MS: i64 = 86_400_000;

/// Gathers, filters and pages suggested topics
pub struct SuggestedTopics {
    topics: Arc<dyn TopicRepository>,
    sorted_sets: Arc<dyn SortedSetIndex>,
    search: Arc<dyn TopicSearch>,
    privileges: Arc<dyn PrivilegeFilter>,
    blocks: Arc<dyn BlockFilter>,
    cutoff_unit_ms: i64,
}

impl fmt::Debug for SuggestedTopics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestedTopics")
            .field("cutoff_unit_ms", &self.cutoff_unit_ms)
            .finish_non_exhaustive()
    }
}

impl SuggestedTopics {
    pub fn new(
        topics: Arc<dyn TopicRepository>,
        sorted_sets: Arc<dyn SortedSetIndex>,
        search: Arc<dyn TopicSearch>,
        privileges: Arc<dyn PrivilegeFilter>,
        blocks: Arc<dyn BlockFilter>,
    ) -> Self {
        Self {
            topics,
            sorted_sets,
            search,
            privileges,
            blocks,
            cutoff_unit_ms: DEFAULT_CUTOFF_UNIT_MS,
        }
    }

    /// Sets how many milliseconds one unit of `cutoff` spans
    pub fn with_cutoff_unit_ms(mut self, cutoff_unit_ms: i64) -> Self {
        self.cutoff_unit_ms = cutoff_unit_ms;
        self
    }

    /// Returns the page `window` of topics related to `tid` that `uid` may read,
    /// newest first. `cutoff` limits candidates to the last `cutoff` units of
    /// time; `0` disables it.
    #[instrument(name = "suggested_topics", skip(self))]
    pub async fn get_suggested_topics(
        &self,
        tid: Tid,
        uid: Uid,
        window: PageWindow,
        cutoff: u64,
    ) -> Result<Vec<Topic>> {
        let cutoff_ms: i64 = self.cutoff_ms(cutoff);

        let (tag_tids, search_tids) = tokio::try_join!(
            self.tids_with_same_tags(tid, cutoff_ms),
            self.search_tids(tid, uid, cutoff_ms),
        )?;
        debug!(tags = tag_tids.len(), search = search_tids.len(), "collected candidates");

        let mut tids: Vec<Tid> = uniq(tag_tids.into_iter().chain(search_tids));

        let mut category_tids: Vec<Tid> = Vec::new();
        if window.len().is_some_and(|len| tids.len() < len) {
            category_tids = self.category_tids(tid, cutoff_ms).await?;
            debug!(category = category_tids.len(), "topped up from category");
        }
        tids = uniq(tids.into_iter().chain(category_tids));
        tids.shuffle(&mut rand::thread_rng());

        let tids: Vec<Tid> = self
            .privileges
            .filter_tids(TOPICS_READ, tids, uid)
            .await
            .context("Failed to filter suggested topics by privilege")?;

        let topics: Vec<Topic> = self
            .topics
            .topics_by_tids(&tids, uid)
            .await
            .context("Failed to load suggested topics")?
            .into_iter()
            .flatten()
            .filter(|topic| topic.tid != tid)
            .collect();

        let topics: Vec<Topic> = self
            .blocks
            .filter(uid, topics)
            .await
            .context("Failed to filter suggested topics by user blocks")?;

        let mut page: Vec<Topic> = window.slice(topics);
        page.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(page)
    }

    fn cutoff_ms(&self, cutoff: u64) -> i64 {
        if cutoff == 0 {
            return 0;
        }
        i64::try_from(cutoff)
            .unwrap_or(i64::MAX)
            .saturating_mul(self.cutoff_unit_ms)
    }

    async fn tids_with_same_tags(&self, tid: Tid, cutoff_ms: i64) -> Result<Vec<Tid>> {
        let tags: Vec<String> = self
            .topics
            .topic_tags(tid)
            .await
            .context("Failed to read topic tags")?;
        let keys: Vec<String> = tags.iter().map(|tag| tag_topics_key(tag)).collect();

        let tids: Vec<Tid> = self
            .ranged(&keys, None, cutoff_ms)
            .await
            .context("Failed to read topics sharing tags")?;

        let mut tids: Vec<Tid> = uniq(tids.into_iter().filter(|&t| t != tid));
        tids.shuffle(&mut rand::thread_rng());
        tids.truncate(MAX_SOURCE_CANDIDATES);
        Ok(tids)
    }

    async fn search_tids(&self, tid: Tid, uid: Uid, cutoff_ms: i64) -> Result<Vec<Tid>> {
        let Some(fields) = self.fields(tid).await? else {
            return Ok(Vec::new());
        };

        let query: SearchQuery = SearchQuery {
            query: fields.title,
            match_words: MatchWords::Any,
            categories: vec![fields.cid],
            uid,
            time_range_secs: u64::try_from(cutoff_ms / 1000).unwrap_or(0),
            time_filter: TimeFilter::Newer,
        };
        let result = self
            .search
            .search(&query)
            .await
            .context("Failed to search for similar topics")?;

        let mut tids: Vec<Tid> = result.tids.into_iter().filter(|&t| t != tid).collect();
        tids.shuffle(&mut rand::thread_rng());
        tids.truncate(MAX_SOURCE_CANDIDATES);
        Ok(tids)
    }

    async fn category_tids(&self, tid: Tid, cutoff_ms: i64) -> Result<Vec<Tid>> {
        let Some(fields) = self.fields(tid).await? else {
            return Ok(Vec::new());
        };

        let keys: [String; 1] = [category_recent_key(fields.cid)];
        let tids: Vec<Tid> = self
            .ranged(&keys, Some(CATEGORY_CANDIDATES), cutoff_ms)
            .await
            .context("Failed to read recent category topics")?;

        let mut tids: Vec<Tid> = tids.into_iter().filter(|&t| t != tid).collect();
        tids.shuffle(&mut rand::thread_rng());
        Ok(tids)
    }

    async fn fields(&self, tid: Tid) -> Result<Option<TopicFields>> {
        self.topics
            .topic_fields(tid)
            .await
            .context("Failed to read topic fields")
    }

    async fn ranged(&self, keys: &[String], limit: Option<usize>, cutoff_ms: i64) -> Result<Vec<Tid>> {
        if cutoff_ms == 0 {
            return self.sorted_sets.rev_range(keys, limit).await;
        }
        let min_score: i64 = Utc::now().timestamp_millis().saturating_sub(cutoff_ms);
        self.sorted_sets.rev_range_by_score(keys, limit, min_score).await
    }
}

/// Removes repeated ids, keeping the first occurrence
fn uniq(tids: impl IntoIterator<Item = Tid>) -> Vec<Tid> {
    let mut seen: HashSet<Tid> = HashSet::new();
    tids.into_iter().filter(|tid| seen.insert(*tid)).collect()
}
