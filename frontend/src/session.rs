//! 会话存储模块
//!
//! 持久化的键值存储，保存 accessToken / refreshToken / role 三个键。
//! 存储后端通过 `KeyValueStore` 注入：浏览器中为 localStorage，测试中为内存表。
//! 单线程 UI，后写覆盖先写，不保证跨标签页一致。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sqlab_shared::{Role, TokenPair};

/// 会话使用的存储键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    Role,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [
        SessionKey::AccessToken,
        SessionKey::RefreshToken,
        SessionKey::Role,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::AccessToken => "accessToken",
            SessionKey::RefreshToken => "refreshToken",
            SessionKey::Role => "role",
        }
    }
}

/// 字符串键值存储后端
///
/// 所有操作都不会失败：读取失败视为缺失，写入失败被静默忽略。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 进程内存储，用于测试和无 localStorage 的环境
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // 单线程使用，锁中毒时继续使用内部数据
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// 某一时刻的会话快照
///
/// 空字符串令牌视为缺失；未知的角色字符串视为缺失。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// 会话存储
///
/// 克隆开销很小，所有克隆共享同一个后端。
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// 共享的底层后端（主题、配置等非会话键也存放于此）
    pub fn backend(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.backend)
    }

    pub fn get(&self, key: SessionKey) -> Option<String> {
        self.backend.get(key.as_str())
    }

    pub fn set(&self, key: SessionKey, value: &str) {
        self.backend.set(key.as_str(), value);
    }

    pub fn clear(&self, key: SessionKey) {
        self.backend.remove(key.as_str());
    }

    /// 清除三个会话键，其它持久化键保持不变
    pub fn clear_all(&self) {
        for key in SessionKey::ALL {
            self.clear(key);
        }
        log::debug!("[Session] cleared");
    }

    pub fn save_tokens(&self, tokens: &TokenPair) {
        self.set(SessionKey::AccessToken, &tokens.access);
        self.set(SessionKey::RefreshToken, &tokens.refresh);
    }

    pub fn save_role(&self, role: Role) {
        self.set(SessionKey::Role, role.as_str());
    }

    pub fn snapshot(&self) -> Session {
        let non_empty = |key| self.get(key).filter(|v| !v.is_empty());
        Session {
            access_token: non_empty(SessionKey::AccessToken),
            refresh_token: non_empty(SessionKey::RefreshToken),
            role: self.get(SessionKey::Role).as_deref().and_then(Role::parse),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_get_reads_back() {
        let store = SessionStore::in_memory();
        assert_eq!(store.get(SessionKey::AccessToken), None);
        store.set(SessionKey::AccessToken, "a1");
        store.set(SessionKey::AccessToken, "a2");
        assert_eq!(store.get(SessionKey::AccessToken).as_deref(), Some("a2"));
    }

    #[test]
    fn clones_share_the_backend() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        other.save_role(Role::Teacher);
        assert_eq!(store.snapshot().role, Some(Role::Teacher));
    }

    #[test]
    fn clear_all_keeps_unrelated_keys() {
        let store = SessionStore::in_memory();
        store.save_tokens(&TokenPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        });
        store.save_role(Role::Student);
        store.backend().set("darkMode", "true");

        store.clear_all();

        assert_eq!(store.snapshot(), Session::default());
        assert_eq!(store.backend().get("darkMode").as_deref(), Some("true"));
    }

    #[test]
    fn snapshot_drops_empty_tokens_and_unknown_roles() {
        let store = SessionStore::in_memory();
        store.set(SessionKey::AccessToken, "");
        store.set(SessionKey::Role, "admin");
        let session = store.snapshot();
        assert!(!session.is_authenticated());
        assert_eq!(session.role, None);
    }
}
