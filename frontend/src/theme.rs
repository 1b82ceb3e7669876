//! 主题上下文
//!
//! 深色/浅色偏好在首次渲染时可能尚未确定（`None`），
//! 应用根组件在其确定前只渲染中性的加载状态。启动时只解析一次。
//! 偏好以 JSON 布尔值保存在注入的 `KeyValueStore` 中，`data-theme` 由根组件同步。

use std::sync::Arc;

use leptos::prelude::*;

use crate::session::KeyValueStore;

const STORAGE_KEY: &str = "darkMode";

/// 配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub paper: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

const DARK: Palette = Palette {
    background: "#1E2A44",
    paper: "#2A3B5A",
    text_primary: "#E0E7FF",
    text_secondary: "#A3BFFA",
    primary: "#3B82F6",
    secondary: "#4B6CB7",
};

const LIGHT: Palette = Palette {
    background: "#F5F5F5",
    paper: "#FFFFFF",
    text_primary: "#1E2A44",
    text_secondary: "#4B6CB7",
    primary: "#1976D2",
    secondary: "#B0BEC5",
};

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark { DARK } else { LIGHT }
    }

    /// 以 CSS 变量形式输出，挂在根节点的 style 上
    pub fn css_vars(&self) -> String {
        format!(
            "--sq-bg:{};--sq-paper:{};--sq-text:{};--sq-text-2:{};--sq-primary:{};--sq-secondary:{};",
            self.background,
            self.paper,
            self.text_primary,
            self.text_secondary,
            self.primary,
            self.secondary
        )
    }
}

/// 已保存的偏好优先，其次是系统偏好
pub fn resolve_preference(stored: Option<bool>, system_dark: bool) -> bool {
    stored.unwrap_or(system_dark)
}

pub fn theme_name(dark: bool) -> &'static str {
    if dark { "dark" } else { "light" }
}

#[derive(Clone, Copy)]
pub struct ThemeContext {
    dark: RwSignal<Option<bool>>,
    store: StoredValue<Arc<dyn KeyValueStore>>,
}

impl ThemeContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            dark: RwSignal::new(None),
            store: StoredValue::new(store),
        }
    }

    /// 启动时调用一次；已确定后再次调用无效
    pub fn resolve(&self, system_dark: bool) {
        if self.dark.get_untracked().is_some() {
            return;
        }
        let dark = resolve_preference(self.stored_preference(), system_dark);
        log::debug!("[Theme] resolved to {}", theme_name(dark));
        self.dark.set(Some(dark));
    }

    /// `None` 表示尚未确定
    pub fn dark_mode(&self) -> Signal<Option<bool>> {
        self.dark.into()
    }

    /// 同步更新，立即可见
    pub fn set_dark_mode(&self, dark: bool) {
        self.dark.set(Some(dark));
        match serde_json::to_string(&dark) {
            Ok(raw) => KeyValueStore::set(&*self.store.get_value(), STORAGE_KEY, &raw),
            Err(e) => log::warn!("[Theme] preference not persisted: {}", e),
        }
    }

    pub fn toggle(&self) {
        let dark = self.dark.get_untracked().unwrap_or(false);
        self.set_dark_mode(!dark);
    }

    /// 无法解析的值视为未保存
    fn stored_preference(&self) -> Option<bool> {
        let raw = KeyValueStore::get(&*self.store.get_value(), STORAGE_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn stored_preference_overrides_system() {
        assert!(!resolve_preference(Some(false), true));
        assert!(resolve_preference(Some(true), false));
        assert!(resolve_preference(None, true));
        assert!(!resolve_preference(None, false));
    }

    #[test]
    fn palettes_match_modes() {
        assert_eq!(Palette::for_mode(true).background, "#1E2A44");
        assert_eq!(Palette::for_mode(false).primary, "#1976D2");
        assert!(Palette::for_mode(true).css_vars().starts_with("--sq-bg:#1E2A44;"));
    }

    fn context(stored: Option<&str>) -> (ThemeContext, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        if let Some(raw) = stored {
            KeyValueStore::set(&*store, STORAGE_KEY, raw);
        }
        (ThemeContext::new(Arc::clone(&store)), store)
    }

    #[test]
    fn unresolved_until_startup_resolution() {
        let owner = Owner::new();
        owner.set();
        let (theme, _) = context(None);
        assert_eq!(theme.dark_mode().get_untracked(), None);

        theme.resolve(true);
        assert_eq!(theme.dark_mode().get_untracked(), Some(true));
    }

    #[test]
    fn second_resolution_keeps_first_value() {
        let owner = Owner::new();
        owner.set();
        let (theme, store) = context(Some("false"));
        theme.resolve(true);
        assert_eq!(theme.dark_mode().get_untracked(), Some(false));

        KeyValueStore::set(&*store, STORAGE_KEY, "true");
        theme.resolve(true);
        assert_eq!(theme.dark_mode().get_untracked(), Some(false));
    }

    #[test]
    fn setter_is_visible_immediately_and_persisted() {
        let owner = Owner::new();
        owner.set();
        let (theme, store) = context(None);
        theme.resolve(false);

        theme.set_dark_mode(true);
        assert_eq!(theme.dark_mode().get_untracked(), Some(true));
        assert_eq!(KeyValueStore::get(&*store, STORAGE_KEY).as_deref(), Some("true"));

        theme.toggle();
        assert_eq!(theme.dark_mode().get_untracked(), Some(false));
        assert_eq!(KeyValueStore::get(&*store, STORAGE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn unreadable_preference_falls_back_to_system() {
        let owner = Owner::new();
        owner.set();
        let (theme, _) = context(Some("sombre"));
        theme.resolve(true);
        assert_eq!(theme.dark_mode().get_untracked(), Some(true));
    }

    #[test]
    fn theme_names() {
        assert_eq!(theme_name(true), "dark");
        assert_eq!(theme_name(false), "light");
    }
}
