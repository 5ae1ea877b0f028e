pub mod adapter;
pub mod config;
pub mod error;
pub mod redisearch;
pub mod schema;
pub mod search;
pub mod task;

use adapter::AdapterRegistry;

// Register all built-in adapters / 注册所有内置适配器
pub async fn register_adapters(registry: &AdapterRegistry) -> anyhow::Result<()> {
    // Register RediSearch adapter / 注册RediSearch适配器
    registry
        .register_factory(Box::new(redisearch::RediSearchAdapterFactory))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_adapters() {
        let registry = AdapterRegistry::new();
        register_adapters(&registry).await.unwrap();
        assert_eq!(registry.adapter_types().await, vec!["redisearch".to_string()]);
        let adapter = registry
            .create_adapter("default", "redisearch", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(adapter.name(), "redisearch");
    }
}
