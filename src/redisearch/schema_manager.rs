//! Index lifecycle: `FT.INFO`, `FT.CREATE`, `FT.DROPINDEX` / 索引管理

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::connection::{execute, RedisConnection};
use super::fields::flatten_fields;
use crate::adapter::SchemaManager;
use crate::error::{AdapterError, Result};
use crate::schema::Index;
use crate::task::{SyncTask, TaskOptions};

pub struct RediSearchSchemaManager {
    connection: Arc<dyn RedisConnection>,
}

impl RediSearchSchemaManager {
    pub fn new(connection: Arc<dyn RedisConnection>) -> Self {
        Self { connection }
    }

    /// Build the `FT.CREATE` command for a schema / 构建建索引命令
    ///
    /// Documents are stored as JSON under keys prefixed with the index name.
    /// Every indexed field contributes `<path> AS <name> <type>`, followed by
    /// `NOINDEX` when it is only sortable and `SORTABLE` when sortable.
    pub fn create_index_command(index: &Index) -> Result<Vec<String>> {
        let native_fields = flatten_fields(&index.fields);

        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut properties = Vec::with_capacity(native_fields.len() * 5);
        for field in native_fields.values() {
            let native_name = field.native_name();
            if let Some(other) = seen.insert(native_name.clone(), &field.name) {
                return Err(AdapterError::InvalidSchema(format!(
                    "fields \"{}\" and \"{}\" both map to native attribute \"{}\"",
                    other, field.name, native_name
                )));
            }

            properties.push(field.json_path.clone());
            properties.push("AS".to_string());
            properties.push(native_name);
            properties.push(field.native_type.as_str().to_string());

            if field.is_noindex() {
                properties.push("NOINDEX".to_string());
            }
            if field.sortable {
                properties.push("SORTABLE".to_string());
            }
        }

        let mut command: Vec<String> = vec![
            "FT.CREATE".to_string(),
            index.name.clone(),
            "ON".to_string(),
            "JSON".to_string(),
            "PREFIX".to_string(),
            "1".to_string(),
            index.name.clone(),
            "SCHEMA".to_string(),
        ];
        command.extend(properties);
        Ok(command)
    }
}

#[async_trait]
impl SchemaManager for RediSearchSchemaManager {
    async fn exist_index(&self, index: &Index) -> Result<bool> {
        tracing::debug!("Redis command: FT.INFO {}", index.name);
        let info = self
            .connection
            .raw_command(vec!["FT.INFO".to_string(), index.name.clone()])
            .await;

        match info {
            Ok(_) => Ok(true),
            Err(e) if e.is_unknown_index() => Ok(false),
            Err(e) => {
                tracing::error!("Index probe failed: {} - {}", index.name, e);
                Err(e.into())
            }
        }
    }

    async fn create_index(&self, index: &Index, options: &TaskOptions) -> Result<Option<SyncTask>> {
        let command = Self::create_index_command(index)?;
        execute(self.connection.as_ref(), command).await?;

        tracing::info!("Search index created: {}", index.name);
        Ok(options.completed())
    }

    async fn drop_index(&self, index: &Index, options: &TaskOptions) -> Result<Option<SyncTask>> {
        execute(
            self.connection.as_ref(),
            vec!["FT.DROPINDEX".to_string(), index.name.clone()],
        )
        .await?;

        tracing::info!("Search index dropped: {}", index.name);
        Ok(options.completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redisearch::connection::testing::RecordingConnection;
    use crate::redisearch::connection::Reply;
    use crate::schema::{fields, Field};

    fn products() -> Index {
        Index::new("products")
            .with_field("id", Field::identifier())
            .with_field("title", Field::text().searchable())
            .with_field("price", Field::float().filterable().sortable())
    }

    fn manager(connection: &Arc<RecordingConnection>) -> RediSearchSchemaManager {
        RediSearchSchemaManager::new(connection.clone())
    }

    #[tokio::test]
    async fn test_create_index_command() {
        let connection = Arc::new(RecordingConnection::new().with_reply(Reply::Ok));
        let task = manager(&connection)
            .create_index(&products(), &TaskOptions::default())
            .await
            .unwrap();

        assert!(task.is_none());
        assert_eq!(
            connection.last_command().unwrap(),
            "FT.CREATE products ON JSON PREFIX 1 products SCHEMA $.title AS title TEXT $.price AS price NUMERIC SORTABLE"
        );
    }

    #[test]
    fn test_create_index_flags_and_nesting() {
        let index = Index::new("blog")
            .with_field("id", Field::identifier().filterable())
            .with_field("published", Field::date_time().sortable())
            .with_field("visible", Field::boolean().filterable())
            .with_field(
                "footer",
                Field::object(fields([("title", Field::text().searchable().sortable())])).searchable(),
            )
            .with_field("tags", Field::text().filterable().multiple());

        let command = RediSearchSchemaManager::create_index_command(&index).unwrap();
        assert_eq!(
            command[8..].join(" "),
            "$.id AS id TEXT \
             $.published AS published TEXT NOINDEX SORTABLE \
             $.visible AS visible TAG \
             $.footer.title AS footer__title TEXT SORTABLE \
             $.tags[*] AS tags TEXT"
        );
    }

    #[test]
    fn test_colliding_native_names_rejected() {
        let index = Index::new("blog")
            .with_field("id", Field::identifier())
            .with_field("meta__title", Field::text().searchable())
            .with_field(
                "meta",
                Field::object(fields([("title", Field::text().searchable())])).searchable(),
            );

        let err = RediSearchSchemaManager::create_index_command(&index).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidSchema(_)));
    }

    #[tokio::test]
    async fn test_create_index_failure_propagates() {
        let connection = Arc::new(RecordingConnection::new().with_error("Index already exists"));
        let err = manager(&connection)
            .create_index(&products(), &TaskOptions::with_task())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Redis: Index already exists");
    }

    #[tokio::test]
    async fn test_exist_index() {
        let connection = Arc::new(
            RecordingConnection::new()
                .with_reply(Reply::Array(vec![Reply::Bulk("index_name".to_string())]))
                .with_error("Unknown Index name")
                .with_error("NOAUTH Authentication required."),
        );
        let manager = manager(&connection);

        assert!(manager.exist_index(&products()).await.unwrap());
        assert!(!manager.exist_index(&products()).await.unwrap());
        assert!(manager.exist_index(&products()).await.unwrap_err().is_store());
        assert_eq!(connection.last_command().unwrap(), "FT.INFO products");
    }

    #[tokio::test]
    async fn test_drop_index_returns_task_on_request() {
        let connection = Arc::new(RecordingConnection::new());
        let manager = manager(&connection);

        assert!(manager
            .drop_index(&products(), &TaskOptions::default())
            .await
            .unwrap()
            .is_none());
        assert!(manager
            .drop_index(&products(), &TaskOptions::with_task())
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            connection.commands(),
            vec![
                vec!["FT.DROPINDEX".to_string(), "products".to_string()],
                vec!["FT.DROPINDEX".to_string(), "products".to_string()],
            ]
        );
    }
}
