// In-process forum store implementing every suggestion source
// Categories are readable by everyone unless restricted to a set of uids.
// Deleted topics are only readable by their author.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{Cid, Tid, Topic, TopicFields, Uid, GUEST_UID};
use super::sources::{
    category_recent_key, search_words, tag_topics_key, BlockFilter, MatchWords, PrivilegeFilter,
    SearchQuery, SearchResult, SortedSetIndex, TimeFilter, TopicRepository, TopicSearch,
};

#[derive(Debug, Default)]
struct ForumData {
    topics: HashMap<Tid, Topic>,
    sorted_sets: HashMap<String, HashMap<Tid, i64>>,
    restricted_categories: HashMap<Cid, HashSet<Uid>>,
    blocked: HashMap<Uid, HashSet<Uid>>,
    read_at: HashMap<(Uid, Tid), i64>,
}

#[derive(Debug, Default)]
pub struct InMemoryForum {
    data: RwLock<ForumData>,
}

impl InMemoryForum {
    /// Stores a topic and files it under its tags and category
    pub async fn insert_topic(&self, topic: Topic) {
        let mut data = self.data.write().await;
        for tag in &topic.tags {
            data.sorted_sets
                .entry(tag_topics_key(tag))
                .or_default()
                .insert(topic.tid, topic.timestamp);
        }
        data.sorted_sets
            .entry(category_recent_key(topic.cid))
            .or_default()
            .insert(topic.tid, topic.last_post_time);
        data.topics.insert(topic.tid, topic);
    }

    /// Limits reading `cid` to the given uids
    pub async fn restrict_category(&self, cid: Cid, readers: impl IntoIterator<Item = Uid>) {
        let mut data = self.data.write().await;
        data.restricted_categories
            .entry(cid)
            .or_default()
            .extend(readers);
    }

    pub async fn block(&self, uid: Uid, blocked_uid: Uid) {
        let mut data = self.data.write().await;
        data.blocked.entry(uid).or_default().insert(blocked_uid);
    }

    /// Records that `uid` read `tid` at `at` (ms)
    pub async fn mark_read(&self, uid: Uid, tid: Tid, at: i64) {
        let mut data = self.data.write().await;
        data.read_at.insert((uid, tid), at);
    }
}

impl ForumData {
    fn range(&self, keys: &[String], limit: Option<usize>, min_score: Option<i64>) -> Vec<Tid> {
        let mut scored: Vec<(Tid, i64)> = keys
            .iter()
            .filter_map(|key| self.sorted_sets.get(key))
            .flat_map(|set| set.iter().map(|(&tid, &score)| (tid, score)))
            .filter(|&(_, score)| min_score.is_none_or(|min| score >= min))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        if let Some(limit) = limit {
            scored.truncate(limit);
        }
        scored.into_iter().map(|(tid, _)| tid).collect()
    }

    fn can_read(&self, topic: &Topic, uid: Uid) -> bool {
        if topic.deleted && topic.uid != uid {
            return false;
        }
        self.restricted_categories
            .get(&topic.cid)
            .is_none_or(|readers| readers.contains(&uid))
    }
}

#[async_trait]
impl TopicRepository for InMemoryForum {
    async fn topic_tags(&self, tid: Tid) -> Result<Vec<String>> {
        let data = self.data.read().await;
        Ok(data.topics.get(&tid).map(|t| t.tags.clone()).unwrap_or_default())
    }

    async fn topic_fields(&self, tid: Tid) -> Result<Option<TopicFields>> {
        let data = self.data.read().await;
        Ok(data.topics.get(&tid).map(|t| TopicFields {
            title: t.title.clone(),
            cid: t.cid,
        }))
    }

    async fn topics_by_tids(&self, tids: &[Tid], uid: Uid) -> Result<Vec<Option<Topic>>> {
        let data = self.data.read().await;
        Ok(tids
            .iter()
            .map(|tid| {
                data.topics.get(tid).map(|topic| {
                    let mut topic: Topic = topic.clone();
                    topic.unread = uid != GUEST_UID
                        && data
                            .read_at
                            .get(&(uid, topic.tid))
                            .is_none_or(|&at| at < topic.last_post_time);
                    topic
                })
            })
            .collect())
    }
}

#[async_trait]
impl SortedSetIndex for InMemoryForum {
    async fn rev_range(&self, keys: &[String], limit: Option<usize>) -> Result<Vec<Tid>> {
        Ok(self.data.read().await.range(keys, limit, None))
    }

    async fn rev_range_by_score(
        &self,
        keys: &[String],
        limit: Option<usize>,
        min_score: i64,
    ) -> Result<Vec<Tid>> {
        Ok(self.data.read().await.range(keys, limit, Some(min_score)))
    }
}

#[async_trait]
impl TopicSearch for InMemoryForum {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let words: Vec<String> = query.words();
        if words.is_empty() {
            return Ok(SearchResult::default());
        }
        let bound: Option<i64> = query.time_bound_ms(Utc::now().timestamp_millis());

        let data = self.data.read().await;
        let mut hits: Vec<&Topic> = data
            .topics
            .values()
            .filter(|t| query.categories.is_empty() || query.categories.contains(&t.cid))
            .filter(|t| match (bound, query.time_filter) {
                (None, _) => true,
                (Some(bound), TimeFilter::Newer) => t.timestamp >= bound,
                (Some(bound), TimeFilter::Older) => t.timestamp <= bound,
            })
            .filter(|t| {
                let title: HashSet<String> = search_words(&t.title).into_iter().collect();
                match query.match_words {
                    MatchWords::Any => words.iter().any(|w| title.contains(w)),
                    MatchWords::All => words.iter().all(|w| title.contains(w)),
                }
            })
            .collect();
        hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(SearchResult {
            tids: hits.into_iter().map(|t| t.tid).collect(),
        })
    }
}

#[async_trait]
impl PrivilegeFilter for InMemoryForum {
    async fn filter_tids(&self, _privilege: &str, tids: Vec<Tid>, uid: Uid) -> Result<Vec<Tid>> {
        let data = self.data.read().await;
        Ok(tids
            .into_iter()
            .filter(|tid| data.topics.get(tid).is_some_and(|t| data.can_read(t, uid)))
            .collect())
    }
}

#[async_trait]
impl BlockFilter for InMemoryForum {
    async fn filter(&self, uid: Uid, topics: Vec<Topic>) -> Result<Vec<Topic>> {
        let data = self.data.read().await;
        let Some(blocked) = data.blocked.get(&uid) else {
            return Ok(topics);
        };
        Ok(topics.into_iter().filter(|t| !blocked.contains(&t.uid)).collect())
    }
}
