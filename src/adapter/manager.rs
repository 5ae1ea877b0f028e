use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use anyhow::{anyhow, Result};
use serde_json::Value;

use super::Adapter;

pub type AdapterBox = Arc<Box<dyn Adapter>>;

/// Adapter factory trait / 适配器工厂 trait
pub trait AdapterFactory: Send + Sync {
    /// Adapter type name / 适配器类型名称
    fn adapter_type(&self) -> &'static str;

    /// 创建适配器实例
    fn create_adapter(&self, config: Value) -> Result<Box<dyn Adapter>>;
}

/// Adapter registry (factories by type, adapters by name) / 适配器注册表
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Arc<RwLock<HashMap<String, AdapterBox>>>,
    factories: Arc<RwLock<HashMap<String, Arc<Box<dyn AdapterFactory>>>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: Arc::new(RwLock::new(HashMap::new())),
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register adapter factory / 注册适配器工厂
    pub async fn register_factory(&self, factory: Box<dyn AdapterFactory>) -> Result<()> {
        let adapter_type = factory.adapter_type().to_string();
        let factory_box = Arc::new(factory);

        let mut factories = self.factories.write().await;
        factories.insert(adapter_type.clone(), factory_box);

        tracing::info!("Adapter factory registered: {}", adapter_type);
        Ok(())
    }

    /// Create adapter instance / 创建适配器实例
    pub async fn create_adapter(&self, name: &str, adapter_type: &str, config: Value) -> Result<AdapterBox> {
        let factory = {
            let factories = self.factories.read().await;
            factories
                .get(adapter_type)
                .cloned()
                .ok_or_else(|| anyhow!("Adapter type not found: {}", adapter_type))?
        };

        let adapter = match factory.create_adapter(config) {
            Ok(adapter) => adapter,
            Err(e) => {
                tracing::error!("Adapter creation failed: {} ({}) - {}", name, adapter_type, e);
                return Err(e);
            }
        };

        let adapter_box: AdapterBox = Arc::new(adapter);
        let mut adapters = self.adapters.write().await;
        adapters.insert(name.to_string(), adapter_box.clone());

        tracing::info!("Adapter created: {} ({})", name, adapter_type);
        Ok(adapter_box)
    }

    /// Get adapter instance / 获取适配器实例
    pub async fn get_adapter(&self, name: &str) -> Option<AdapterBox> {
        let adapters = self.adapters.read().await;
        adapters.get(name).cloned()
    }

    /// Remove adapter instance / 移除适配器实例
    pub async fn remove_adapter(&self, name: &str) -> Result<()> {
        let mut adapters = self.adapters.write().await;
        adapters
            .remove(name)
            .ok_or_else(|| anyhow!("Adapter not found: {}", name))?;

        tracing::info!("Adapter removed: {}", name);
        Ok(())
    }

    /// Registered adapter types / 已注册的适配器类型
    pub async fn adapter_types(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        let mut types: Vec<String> = factories.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
