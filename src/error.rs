//! Adapter error types / 适配器错误类型
//!
//! Not-found situations (missing index, missing document) are never errors,
//! they surface as `false` / empty results. Everything here is fatal for the
//! current call and is propagated to the caller without retry.

use thiserror::Error;

/// Adapter error / 适配器错误
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Store communication failure, carries the native error text / 存储通信失败
    #[error("Redis: {0}")]
    Store(String),

    /// Operation not supported by this adapter / 不支持的操作
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Schema cannot be translated into a native index / 无效的索引结构
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Caller input cannot be translated / 无效参数
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Native reply has an unexpected shape / 响应解码失败
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Whether this is a store communication failure / 是否为存储通信错误
    pub fn is_store(&self) -> bool {
        matches!(self, AdapterError::Store(_))
    }

    /// Whether this is an unsupported-operation error / 是否为不支持的操作
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AdapterError::Unsupported(_))
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message() {
        let err = AdapterError::Store("Unknown index name".to_string());
        assert_eq!(err.to_string(), "Redis: Unknown index name");
        assert!(err.is_store());
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: AdapterError = parse.unwrap_err().into();
        assert!(matches!(err, AdapterError::Json(_)));
    }
}
