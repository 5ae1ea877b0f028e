//! RediSearch adapter configuration / RediSearch 适配器配置

use serde::{Deserialize, Serialize};

/// RediSearch配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RediSearchConfig {
    /// Redis连接地址，需加载 RediSearch 与 RedisJSON 模块
    /// redis://[:password@]host:port[/db]
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

impl Default for RediSearchConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}
