//! Raw command transport / 原始命令传输
//!
//! The adapter only needs "send these arguments, give me the reply". The
//! connection is owned by the caller; any locking it needs lives here at the
//! boundary, not in the translation code.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::AdapterError;

/// Native reply tree / 原生响应
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Ok,
    Int(i64),
    Bulk(String),
    Status(String),
    Array(Vec<Reply>),
}

impl Reply {
    /// String content of bulk/status replies / 字符串内容
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Bulk(s) | Reply::Status(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(v) => Some(*v),
            Reply::Bulk(s) | Reply::Status(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl From<redis::Value> for Reply {
    fn from(value: redis::Value) -> Self {
        match value {
            redis::Value::Nil => Reply::Nil,
            redis::Value::Okay => Reply::Ok,
            redis::Value::Int(v) => Reply::Int(v),
            redis::Value::Data(bytes) => Reply::Bulk(String::from_utf8_lossy(&bytes).into_owned()),
            redis::Value::Status(s) => Reply::Status(s),
            redis::Value::Bulk(items) => Reply::Array(items.into_iter().map(Reply::from).collect()),
        }
    }
}

/// Store communication failure with the native error text / 存储通信错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether the error reports a missing search index / 是否为索引不存在
    pub fn is_unknown_index(&self) -> bool {
        let message = self.message.to_ascii_lowercase();
        message.contains("unknown index name") || message.contains("no such index")
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        let message = match (err.code(), err.detail()) {
            (Some(code), Some(detail)) => format!("{} {}", code, detail),
            (Some(code), None) => code.to_string(),
            (None, Some(detail)) => detail.to_string(),
            (None, None) => err.to_string(),
        };
        StoreError { message }
    }
}

impl From<StoreError> for AdapterError {
    fn from(err: StoreError) -> Self {
        AdapterError::Store(err.message)
    }
}

/// Raw command connection / 原始命令连接
#[async_trait]
pub trait RedisConnection: Send + Sync {
    /// Send one command and wait for its reply / 发送命令并等待响应
    async fn raw_command(&self, args: Vec<String>) -> Result<Reply, StoreError>;
}

/// Issue a command with logging / 执行命令（带日志）
pub(crate) async fn execute(connection: &dyn RedisConnection, args: Vec<String>) -> Result<Reply, StoreError> {
    let command = args.first().cloned().unwrap_or_default();
    let target = args.get(1).cloned().unwrap_or_default();
    tracing::debug!("Redis command: {} {}", command, target);

    connection.raw_command(args).await.map_err(|e| {
        tracing::error!("Redis command failed: {} {} - {}", command, target, e);
        e
    })
}

/// `redis` crate backed connection, connects on first use / 基于redis客户端的连接
pub struct RedisClient {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisClient {
    /// Parse the URL without connecting / 解析URL（不立即连接）
    pub fn open(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| anyhow::anyhow!("Invalid redis url {}: {}", url, e))?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let mut guard = self.connection.lock().await;
        if let Some(ref connection) = *guard {
            return Ok(connection.clone());
        }

        let connection = self.client.get_multiplexed_async_connection().await?;
        tracing::info!("Redis connected: {:?}", self.client.get_connection_info().addr);

        *guard = Some(connection.clone());
        Ok(connection)
    }
}

#[async_trait]
impl RedisConnection for RedisClient {
    async fn raw_command(&self, args: Vec<String>) -> Result<Reply, StoreError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| StoreError::new("empty command"))?;

        let mut cmd = redis::cmd(name);
        for arg in rest {
            cmd.arg(arg);
        }

        let mut connection = self.get_connection().await?;
        let value: redis::Value = cmd.query_async(&mut connection).await?;
        Ok(Reply::from(value))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Records issued commands and answers with scripted replies / 记录命令的测试连接
    pub struct RecordingConnection {
        commands: Mutex<Vec<Vec<String>>>,
        replies: Mutex<VecDeque<Result<Reply, StoreError>>>,
    }

    impl RecordingConnection {
        pub fn new() -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                replies: Mutex::new(VecDeque::new()),
            }
        }

        pub fn with_reply(self, reply: Reply) -> Self {
            self.replies.lock().push_back(Ok(reply));
            self
        }

        pub fn with_error(self, message: &str) -> Self {
            self.replies.lock().push_back(Err(StoreError::new(message)));
            self
        }

        pub fn commands(&self) -> Vec<Vec<String>> {
            self.commands.lock().clone()
        }

        /// Last command joined by spaces / 最后一条命令
        pub fn last_command(&self) -> Option<String> {
            self.commands.lock().last().map(|c| c.join(" "))
        }
    }

    impl Default for RecordingConnection {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl RedisConnection for RecordingConnection {
        async fn raw_command(&self, args: Vec<String>) -> Result<Reply, StoreError> {
            self.commands.lock().push(args);
            self.replies.lock().pop_front().unwrap_or(Ok(Reply::Ok))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingConnection;
    use super::*;

    #[test]
    fn test_reply_from_redis_value() {
        let value = redis::Value::Bulk(vec![
            redis::Value::Int(1),
            redis::Value::Data(b"news:1".to_vec()),
            redis::Value::Nil,
            redis::Value::Okay,
        ]);
        assert_eq!(
            Reply::from(value),
            Reply::Array(vec![
                Reply::Int(1),
                Reply::Bulk("news:1".to_string()),
                Reply::Nil,
                Reply::Ok,
            ])
        );
        assert_eq!(Reply::Bulk("12".to_string()).as_int(), Some(12));
        assert_eq!(Reply::Status("OK".to_string()).as_str(), Some("OK"));
    }

    #[test]
    fn test_unknown_index_detection() {
        assert!(StoreError::new("Unknown Index name").is_unknown_index());
        assert!(StoreError::new("Unknown index name").is_unknown_index());
        assert!(StoreError::new("news: no such index").is_unknown_index());
        assert!(!StoreError::new("ERR wrong number of arguments").is_unknown_index());
    }

    #[test]
    fn test_store_error_into_adapter_error() {
        let err: AdapterError = StoreError::new("READONLY replica").into();
        assert_eq!(err.to_string(), "Redis: READONLY replica");
    }

    #[test]
    fn test_open_rejects_bad_url() {
        assert!(RedisClient::open("not a url").is_err());
        assert!(RedisClient::open("redis://127.0.0.1:6379").is_ok());
    }

    #[tokio::test]
    async fn test_execute_records_and_propagates() {
        let connection = RecordingConnection::new()
            .with_reply(Reply::Int(1))
            .with_error("boom");

        let reply = execute(&connection, vec!["JSON.DEL".into(), "news:1".into()]).await.unwrap();
        assert_eq!(reply, Reply::Int(1));

        let err = execute(&connection, vec!["JSON.DEL".into(), "news:2".into()]).await.unwrap_err();
        assert_eq!(err.message, "boom");

        assert_eq!(connection.commands().len(), 2);
        assert_eq!(connection.last_command().unwrap(), "JSON.DEL news:2");
    }
}
