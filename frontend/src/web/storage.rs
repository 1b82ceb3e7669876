//! LocalStorage 后端
//!
//! 会话值以原始字符串保存（不做 JSON 编码），与服务端发放的令牌格式一致。

use crate::session::KeyValueStore;

/// 浏览器 localStorage 后端
///
/// 每次操作都重新获取 `Storage`，自身不持有任何 JS 对象。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("[Session] localStorage rejected write of {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
