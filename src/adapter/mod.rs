//! Generic search adapter interfaces / 通用搜索适配器接口
//!
//! An adapter bundles three components: schema manager, indexer and
//! searcher. Concrete backends implement the traits; `AdapterRegistry`
//! selects a backend by type through its factory.

pub mod manager;

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::{Document, Index};
use crate::search::{Search, SearchResult};
use crate::task::{SyncTask, TaskOptions};

pub use manager::{AdapterBox, AdapterFactory, AdapterRegistry};

/// Index lifecycle operations / 索引生命周期操作
#[async_trait]
pub trait SchemaManager: Send + Sync {
    /// Whether the native index exists / 索引是否存在
    async fn exist_index(&self, index: &Index) -> Result<bool>;

    /// Create the native index / 创建索引
    async fn create_index(&self, index: &Index, options: &TaskOptions) -> Result<Option<SyncTask>>;

    /// Drop the native index / 删除索引
    async fn drop_index(&self, index: &Index, options: &TaskOptions) -> Result<Option<SyncTask>>;
}

/// Document write operations / 文档写入操作
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Insert or replace a document / 保存文档
    async fn save(&self, index: &Index, document: &Document, options: &TaskOptions) -> Result<Option<SyncTask>>;

    /// Delete a document if present / 删除文档
    async fn delete(&self, index: &Index, identifier: &str, options: &TaskOptions) -> Result<Option<SyncTask>>;
}

/// Query operations / 查询操作
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, search: &Search) -> Result<SearchResult>;
}

/// Search backend adapter / 搜索后端适配器
pub trait Adapter: Send + Sync {
    /// Adapter name / 适配器名称
    fn name(&self) -> &str;

    fn schema_manager(&self) -> &dyn SchemaManager;

    fn indexer(&self) -> &dyn Indexer;

    fn searcher(&self) -> &dyn Searcher;
}
