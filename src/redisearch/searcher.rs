//! Query execution: `JSON.GET` point lookup and `FT.SEARCH` / 查询执行

use async_trait::async_trait;
use std::sync::Arc;

use super::connection::{execute, RedisConnection};
use super::decode::{decode_get_reply, decode_search_reply};
use super::query::{single_index, translate};
use crate::adapter::Searcher;
use crate::error::Result;
use crate::schema::Index;
use crate::search::{Condition, Documents, Search, SearchResult};

pub struct RediSearchSearcher {
    connection: Arc<dyn RedisConnection>,
}

impl RediSearchSearcher {
    pub fn new(connection: Arc<dyn RedisConnection>) -> Self {
        Self { connection }
    }

    /// Single document fetch by key / 按主键获取单个文档
    async fn get(&self, index: &Index, identifier: &str) -> Result<SearchResult> {
        let reply = execute(
            self.connection.as_ref(),
            vec!["JSON.GET".to_string(), index.document_key(identifier)],
        )
        .await?;

        let hits: Vec<_> = decode_get_reply(&reply)?.into_iter().collect();
        let total = hits.len() as u64;

        Ok(SearchResult::new(Documents::new(index.fields.clone(), hits), total))
    }
}

/// Index and identifier when the request is a plain lookup by id / 判断是否为主键查询
fn point_lookup(search: &Search) -> Option<(&Index, &str)> {
    match (search.indexes.as_slice(), search.filters.as_slice()) {
        ([index], [Condition::Identifier { identifier }])
            if search.offset == 0 && search.limit == Some(1) =>
        {
            Some((index, identifier.as_str()))
        }
        _ => None,
    }
}

#[async_trait]
impl Searcher for RediSearchSearcher {
    async fn search(&self, search: &Search) -> Result<SearchResult> {
        if let Some((index, identifier)) = point_lookup(search) {
            return self.get(index, identifier).await;
        }

        let index = single_index(search)?;
        let native = translate(search)?;
        let fields = index.fields.clone();

        let reply = execute(self.connection.as_ref(), native.into_command()).await?;
        let decoded = decode_search_reply(&reply)?;

        Ok(SearchResult::new(Documents::new(fields, decoded.hits), decoded.total))
    }
}
