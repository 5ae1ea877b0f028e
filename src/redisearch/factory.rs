//! RediSearch适配器工厂

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;

use super::config::RediSearchConfig;
use super::connection::RedisClient;
use super::RediSearchAdapter;
use crate::adapter::{Adapter, AdapterFactory};

/// RediSearch适配器工厂
pub struct RediSearchAdapterFactory;

impl AdapterFactory for RediSearchAdapterFactory {
    fn adapter_type(&self) -> &'static str {
        "redisearch"
    }

    fn create_adapter(&self, config: Value) -> Result<Box<dyn Adapter>> {
        let config: RediSearchConfig = serde_json::from_value(config)
            .map_err(|e| anyhow!("配置解析失败: {}", e))?;
        // 连接在第一次执行命令时建立
        let client = RedisClient::open(&config.url)?;
        Ok(Box::new(RediSearchAdapter::new(Arc::new(client))))
    }
}
