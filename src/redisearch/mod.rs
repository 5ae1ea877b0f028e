//! RediSearch backend / RediSearch 后端
//!
//! Documents are stored as RedisJSON values under `<index>:<id>` and indexed
//! by a RediSearch index created `ON JSON` with the index name as key prefix.

pub mod config;
pub mod connection;
pub mod decode;
pub mod factory;
pub mod fields;
pub mod indexer;
pub mod query;
pub mod schema_manager;
pub mod searcher;

use std::sync::Arc;

use crate::adapter::{Adapter, Indexer, SchemaManager, Searcher};

pub use config::RediSearchConfig;
pub use connection::{RedisClient, RedisConnection, Reply, StoreError};
pub use factory::RediSearchAdapterFactory;
pub use indexer::RediSearchIndexer;
pub use schema_manager::RediSearchSchemaManager;
pub use searcher::RediSearchSearcher;

/// RediSearch adapter: three components over one connection / RediSearch 适配器
pub struct RediSearchAdapter {
    schema_manager: Box<dyn SchemaManager>,
    indexer: Box<dyn Indexer>,
    searcher: Box<dyn Searcher>,
}

impl RediSearchAdapter {
    pub fn new(connection: Arc<dyn RedisConnection>) -> Self {
        Self {
            schema_manager: Box::new(RediSearchSchemaManager::new(connection.clone())),
            indexer: Box::new(RediSearchIndexer::new(connection.clone())),
            searcher: Box::new(RediSearchSearcher::new(connection)),
        }
    }

    /// Replace the schema manager / 替换索引管理组件
    pub fn with_schema_manager(mut self, schema_manager: Box<dyn SchemaManager>) -> Self {
        self.schema_manager = schema_manager;
        self
    }

    pub fn with_indexer(mut self, indexer: Box<dyn Indexer>) -> Self {
        self.indexer = indexer;
        self
    }

    pub fn with_searcher(mut self, searcher: Box<dyn Searcher>) -> Self {
        self.searcher = searcher;
        self
    }
}

impl Adapter for RediSearchAdapter {
    fn name(&self) -> &str {
        "redisearch"
    }

    fn schema_manager(&self) -> &dyn SchemaManager {
        self.schema_manager.as_ref()
    }

    fn indexer(&self) -> &dyn Indexer {
        self.indexer.as_ref()
    }

    fn searcher(&self) -> &dyn Searcher {
        self.searcher.as_ref()
    }
}
