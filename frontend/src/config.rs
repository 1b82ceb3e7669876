//! 运行时配置
//!
//! API 地址的解析顺序：
//! 1. localStorage 中的 `apiBaseUrl` 覆盖值
//! 2. 编译期环境变量 `SQLAB_API_URL`
//! 3. 默认地址

use crate::session::KeyValueStore;

pub const DEFAULT_API_BASE_URL: &str = "https://sql-db-platform-1.onrender.com";
pub const API_BASE_URL_KEY: &str = "apiBaseUrl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: normalize(api_base_url),
        }
    }

    pub fn resolve(store: &dyn KeyValueStore) -> Self {
        Self::resolve_with(store, option_env!("SQLAB_API_URL"))
    }

    fn resolve_with(store: &dyn KeyValueStore, build_time: Option<&str>) -> Self {
        let candidate = store
            .get(API_BASE_URL_KEY)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                build_time
                    .filter(|v| !v.trim().is_empty())
                    .map(str::to_string)
            });
        match candidate {
            Some(url) => Self::new(&url),
            None => Self::default(),
        }
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn stored_override_wins() {
        let store = MemoryStore::new();
        store.set(API_BASE_URL_KEY, "http://localhost:8000/");
        let config = AppConfig::resolve_with(&store, Some("https://build.example.org"));
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn build_time_value_then_default() {
        let store = MemoryStore::new();
        let config = AppConfig::resolve_with(&store, Some("https://build.example.org//"));
        assert_eq!(config.api_base_url, "https://build.example.org");

        let config = AppConfig::resolve_with(&store, Some("  "));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn url_joins_paths() {
        let config = AppConfig::new("https://api.example.org/");
        assert_eq!(config.url("/api/user/"), "https://api.example.org/api/user/");
        assert_eq!(config.url("api/user/"), "https://api.example.org/api/user/");
    }
}
