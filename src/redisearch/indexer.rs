//! Document writes: `JSON.SET`, `JSON.DEL` / 文档写入

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::connection::{execute, RedisConnection};
use crate::adapter::Indexer;
use crate::error::{AdapterError, Result};
use crate::schema::{Document, Index, Marshaller};
use crate::task::{SyncTask, TaskOptions};

pub struct RediSearchIndexer {
    connection: Arc<dyn RedisConnection>,
    marshaller: Marshaller,
}

impl RediSearchIndexer {
    pub fn new(connection: Arc<dyn RedisConnection>) -> Self {
        Self {
            connection,
            marshaller: Marshaller::new(),
        }
    }
}

/// Identifier value of a document as a key segment / 获取文档主键
fn identifier_of(index: &Index, document: &Document) -> Result<String> {
    let field = index.identifier_field()?;

    match document.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AdapterError::InvalidArgument(format!(
            "document for index \"{}\" has no usable \"{}\" identifier",
            index.name, field
        ))),
    }
}

#[async_trait]
impl Indexer for RediSearchIndexer {
    async fn save(&self, index: &Index, document: &Document, options: &TaskOptions) -> Result<Option<SyncTask>> {
        let identifier = identifier_of(index, document)?;
        let marshalled = self.marshaller.marshall(&index.fields, document)?;
        let json = serde_json::to_string(&marshalled)?;

        execute(
            self.connection.as_ref(),
            vec![
                "JSON.SET".to_string(),
                index.document_key(&identifier),
                "$".to_string(),
                json,
            ],
        )
        .await?;

        Ok(options.completed())
    }

    async fn delete(&self, index: &Index, identifier: &str, options: &TaskOptions) -> Result<Option<SyncTask>> {
        // JSON.DEL 对不存在的键返回 0，视为成功
        execute(
            self.connection.as_ref(),
            vec!["JSON.DEL".to_string(), index.document_key(identifier)],
        )
        .await?;

        Ok(options.completed())
    }
}
