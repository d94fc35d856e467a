// Title search over the `topic_search` table using PostgreSQL full-text search

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use crate::database::DatabaseService;
use crate::topics::sources::{MatchWords, SearchQuery, SearchResult, TimeFilter, TopicSearch};
use crate::topics::Tid;

/// Upper bound on rows a single search returns
const SEARCH_RESULT_LIMIT: i64 = 50;

const SEARCH_TITLES_SQL: &str = r#"
    SELECT tid
    FROM topic_search
    WHERE title_tsv @@ to_tsquery('simple', $1)
      AND (cardinality($2::BIGINT[]) = 0 OR cid = ANY($2))
      AND ($3::BIGINT IS NULL OR (CASE WHEN $4 THEN timestamp >= $3 ELSE timestamp <= $3 END))
    ORDER BY timestamp DESC
    LIMIT $5
"#;

/// Title search backed by the `topic_search` table
#[derive(Debug, Clone)]
pub struct PostgresTopicSearch {
    database: DatabaseService,
}

impl PostgresTopicSearch {
    pub fn new(database: DatabaseService) -> Self {
        Self { database }
    }
}

/// Builds a `to_tsquery` expression from the query words, or `None` when
/// there is nothing to search for. Words are alphanumeric so need no quoting.
pub fn build_tsquery(query: &SearchQuery) -> Option<String> {
    let words: Vec<String> = query.words();
    if words.is_empty() {
        return None;
    }
    let joiner: &str = match query.match_words {
        MatchWords::Any => " | ",
        MatchWords::All => " & ",
    };
    Some(words.join(joiner))
}

#[async_trait]
impl TopicSearch for PostgresTopicSearch {
    #[instrument(name = "search_titles", skip(self, query), fields(title = %query.query))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let Some(tsquery) = build_tsquery(query) else {
            return Ok(SearchResult::default());
        };

        let categories: Vec<i64> = query
            .categories
            .iter()
            .filter_map(|&cid| i64::try_from(cid).ok())
            .collect();
        let bound: Option<i64> = query.time_bound_ms(Utc::now().timestamp_millis());
        let newer: bool = query.time_filter == TimeFilter::Newer;

        let pool = self.database.get_pool()?;
        let rows: Vec<i64> = sqlx::query_scalar(SEARCH_TITLES_SQL)
            .bind(&tsquery)
            .bind(&categories)
            .bind(bound)
            .bind(newer)
            .bind(SEARCH_RESULT_LIMIT)
            .fetch_all(pool)
            .await
            .context("Failed to search topic titles")?;

        let tids: Vec<Tid> = rows
            .into_iter()
            .filter_map(|tid| Tid::try_from(tid).ok())
            .collect();
        debug!(hits = tids.len(), "title search finished");

        Ok(SearchResult { tids })
    }
}
