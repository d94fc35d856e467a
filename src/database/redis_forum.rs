// Redis forum store: topic hashes, tag and category sorted sets, privileges and blocks

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::database::RedisService;
use crate::topics::sources::{BlockFilter, PrivilegeFilter, SortedSetIndex, TopicRepository};
use crate::topics::{Cid, Tid, Topic, TopicFields, Uid, GUEST_UID};

/// Members of this set may read every topic
const ADMINISTRATORS_KEY: &str = "group:administrators:members";
/// Grantee covering every viewer with `uid == 0`
const GUESTS_GRANTEE: &str = "guests";
/// Grantee covering every viewer with `uid > 0`
const REGISTERED_GRANTEE: &str = "registered-users";

fn topic_key(tid: Tid) -> String {
    format!("topic:{tid}")
}

fn topic_tags_key(tid: Tid) -> String {
    format!("topic:{tid}:tags")
}

fn blocked_uids_key(uid: Uid) -> String {
    format!("uid:{uid}:blocked_uids")
}

fn tids_read_key(uid: Uid) -> String {
    format!("uid:{uid}:tids_read")
}

fn category_privilege_key(cid: Cid, privilege: &str) -> String {
    format!("cid:{cid}:privileges:{privilege}")
}

/// Reads forum state from the Redis key layout shared with the forum application
#[derive(Debug, Clone)]
pub struct RedisForumStore {
    redis: RedisService,
}

impl RedisForumStore {
    pub fn new(redis: RedisService) -> Self {
        Self { redis }
    }

    async fn scored_range(
        &self,
        keys: &[String],
        limit: Option<usize>,
        min_score: Option<i64>,
    ) -> Result<Vec<Tid>> {
        if keys.is_empty() || limit == Some(0) {
            return Ok(Vec::new());
        }
        let mut conn = self.redis.get_connection().await?;

        let mut pipe = redis::pipe();
        for key in keys {
            match min_score {
                None => {
                    let stop: isize = limit.map_or(-1, |l| isize::try_from(l).unwrap_or(isize::MAX) - 1);
                    pipe.cmd("ZREVRANGE").arg(key).arg(0).arg(stop).arg("WITHSCORES");
                }
                Some(min) => {
                    pipe.cmd("ZREVRANGEBYSCORE").arg(key).arg("+inf").arg(min).arg("WITHSCORES");
                    if let Some(limit) = limit {
                        pipe.arg("LIMIT").arg(0).arg(limit);
                    }
                }
            }
        }

        let per_key: Vec<Vec<(String, f64)>> = pipe
            .query_async(&mut conn)
            .await
            .context("Failed to read sorted set range")?;

        Ok(merge_ranges(per_key, limit))
    }

    async fn is_administrator(&self, uid: Uid) -> Result<bool> {
        if uid == GUEST_UID {
            return Ok(false);
        }
        let mut conn = self.redis.get_connection().await?;
        let is_admin: bool = redis::cmd("SISMEMBER")
            .arg(ADMINISTRATORS_KEY)
            .arg(uid)
            .query_async(&mut conn)
            .await
            .context("Failed to check administrator membership")?;
        Ok(is_admin)
    }
}

/// Unions per-key `(member, score)` lists by descending score and parses members as tids
fn merge_ranges(per_key: Vec<Vec<(String, f64)>>, limit: Option<usize>) -> Vec<Tid> {
    let mut merged: Vec<(String, f64)> = per_key.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(limit) = limit {
        merged.truncate(limit);
    }
    merged
        .into_iter()
        .filter_map(|(member, _)| match member.parse::<Tid>() {
            Ok(tid) => Some(tid),
            Err(_) => {
                warn!(member = %member, "Skipping non-numeric sorted set member");
                None
            }
        })
        .collect()
}

fn field<T: FromStr + Default>(hash: &HashMap<String, String>, name: &str) -> T {
    hash.get(name).and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// Builds a topic from its hash; an empty hash means the topic does not exist
fn topic_from_hash(
    tid: Tid,
    hash: HashMap<String, String>,
    mut tags: Vec<String>,
    read_at: Option<f64>,
    uid: Uid,
) -> Option<Topic> {
    if hash.is_empty() {
        return None;
    }
    tags.sort();
    let last_post_time: i64 = field(&hash, "lastposttime");
    let unread: bool = uid != GUEST_UID && read_at.is_none_or(|at| (at as i64) < last_post_time);

    Some(Topic {
        tid,
        cid: field(&hash, "cid"),
        uid: field(&hash, "uid"),
        title: hash.get("title").cloned().unwrap_or_default(),
        slug: hash.get("slug").cloned().unwrap_or_default(),
        timestamp: field(&hash, "timestamp"),
        last_post_time,
        post_count: field(&hash, "postcount"),
        view_count: field(&hash, "viewcount"),
        deleted: field::<u8>(&hash, "deleted") == 1,
        tags,
        unread,
    })
}

/// Whether a viewer may read a topic given its category grants
fn readable(
    uid: Uid,
    author: Option<Uid>,
    deleted: bool,
    grants: &HashSet<String>,
) -> bool {
    if deleted && author != Some(uid) {
        return false;
    }
    let group: &str = if uid == GUEST_UID { GUESTS_GRANTEE } else { REGISTERED_GRANTEE };
    grants.contains(group) || (uid != GUEST_UID && grants.contains(&format!("uid:{uid}")))
}

#[async_trait]
impl TopicRepository for RedisForumStore {
    async fn topic_tags(&self, tid: Tid) -> Result<Vec<String>> {
        let mut conn = self.redis.get_connection().await?;
        let tags: Vec<String> = redis::cmd("SMEMBERS")
            .arg(topic_tags_key(tid))
            .query_async(&mut conn)
            .await
            .context("Failed to read topic tags")?;
        Ok(tags)
    }

    async fn topic_fields(&self, tid: Tid) -> Result<Option<TopicFields>> {
        let mut conn = self.redis.get_connection().await?;
        let (title, cid): (Option<String>, Option<String>) = redis::cmd("HMGET")
            .arg(topic_key(tid))
            .arg("title")
            .arg("cid")
            .query_async(&mut conn)
            .await
            .context("Failed to read topic fields")?;

        let Some(cid) = cid.and_then(|c| c.parse::<Cid>().ok()) else {
            return Ok(None);
        };
        Ok(Some(TopicFields {
            title: title.unwrap_or_default(),
            cid,
        }))
    }

    #[instrument(name = "topics_by_tids", skip(self, tids), fields(count = tids.len()))]
    async fn topics_by_tids(&self, tids: &[Tid], uid: Uid) -> Result<Vec<Option<Topic>>> {
        if tids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.redis.get_connection().await?;

        let mut hashes_pipe = redis::pipe();
        let mut tags_pipe = redis::pipe();
        for &tid in tids {
            hashes_pipe.cmd("HGETALL").arg(topic_key(tid));
            tags_pipe.cmd("SMEMBERS").arg(topic_tags_key(tid));
        }
        let hashes: Vec<HashMap<String, String>> = hashes_pipe
            .query_async(&mut conn)
            .await
            .context("Failed to read topic hashes")?;
        let tags: Vec<Vec<String>> = tags_pipe
            .query_async(&mut conn)
            .await
            .context("Failed to read topic tags")?;

        let read_at: Vec<Option<f64>> = if uid == GUEST_UID {
            vec![None; tids.len()]
        } else {
            let mut read_pipe = redis::pipe();
            for &tid in tids {
                read_pipe.cmd("ZSCORE").arg(tids_read_key(uid)).arg(tid);
            }
            read_pipe
                .query_async(&mut conn)
                .await
                .context("Failed to read topic read markers")?
        };

        Ok(tids
            .iter()
            .zip(hashes)
            .zip(tags)
            .zip(read_at)
            .map(|(((&tid, hash), tags), read_at)| topic_from_hash(tid, hash, tags, read_at, uid))
            .collect())
    }
}

#[async_trait]
impl SortedSetIndex for RedisForumStore {
    async fn rev_range(&self, keys: &[String], limit: Option<usize>) -> Result<Vec<Tid>> {
        self.scored_range(keys, limit, None).await
    }

    async fn rev_range_by_score(
        &self,
        keys: &[String],
        limit: Option<usize>,
        min_score: i64,
    ) -> Result<Vec<Tid>> {
        self.scored_range(keys, limit, Some(min_score)).await
    }
}

#[async_trait]
impl PrivilegeFilter for RedisForumStore {
    #[instrument(name = "filter_tids", skip(self, tids), fields(count = tids.len()))]
    async fn filter_tids(&self, privilege: &str, tids: Vec<Tid>, uid: Uid) -> Result<Vec<Tid>> {
        if tids.is_empty() || self.is_administrator(uid).await? {
            return Ok(tids);
        }
        let mut conn = self.redis.get_connection().await?;

        let mut fields_pipe = redis::pipe();
        for &tid in &tids {
            fields_pipe.cmd("HMGET").arg(topic_key(tid)).arg("cid").arg("uid").arg("deleted");
        }
        let fields: Vec<(Option<Cid>, Option<Uid>, Option<u8>)> = fields_pipe
            .query_async(&mut conn)
            .await
            .context("Failed to read topic privileges fields")?;

        let cids: Vec<Cid> = fields
            .iter()
            .filter_map(|(cid, _, _)| *cid)
            .collect::<HashSet<Cid>>()
            .into_iter()
            .collect();
        let mut grants_pipe = redis::pipe();
        for &cid in &cids {
            grants_pipe.cmd("SMEMBERS").arg(category_privilege_key(cid, privilege));
        }
        let grants: Vec<HashSet<String>> = if cids.is_empty() {
            Vec::new()
        } else {
            grants_pipe
                .query_async(&mut conn)
                .await
                .context("Failed to read category privileges")?
        };
        let grants: HashMap<Cid, HashSet<String>> = cids.into_iter().zip(grants).collect();

        let allowed: Vec<Tid> = tids
            .into_iter()
            .zip(fields)
            .filter(|(_, (cid, author, deleted))| {
                cid.and_then(|cid| grants.get(&cid))
                    .is_some_and(|g| readable(uid, *author, *deleted == Some(1), g))
            })
            .map(|(tid, _)| tid)
            .collect();
        debug!(allowed = allowed.len(), "privilege filter applied");
        Ok(allowed)
    }
}

#[async_trait]
impl BlockFilter for RedisForumStore {
    async fn filter(&self, uid: Uid, topics: Vec<Topic>) -> Result<Vec<Topic>> {
        if uid == GUEST_UID || topics.is_empty() {
            return Ok(topics);
        }
        let mut conn = self.redis.get_connection().await?;
        let blocked: Vec<Uid> = redis::cmd("ZRANGE")
            .arg(blocked_uids_key(uid))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await
            .context("Failed to read blocked users")?;
        if blocked.is_empty() {
            return Ok(topics);
        }

        let blocked: HashSet<Uid> = blocked.into_iter().collect();
        Ok(topics.into_iter().filter(|t| !blocked.contains(&t.uid)).collect())
    }
}
