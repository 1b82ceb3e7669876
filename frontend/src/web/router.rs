//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程：
//! push / replace / popstate 以及每次会话变化都会重新执行守卫。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{GuardDecision, evaluate};
use super::route::AppRoute;
use crate::session::Session;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 随导航携带的状态
///
/// 只保存在内存中，刷新页面后丢失。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    /// 守卫拦截前的路径，登录成功后返回此处
    pub return_to: Option<String>,
    /// 守卫重定向到个人页时的提示
    pub notice: Option<String>,
}

/// 一次导航请求经过守卫后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: AppRoute,
    pub state: NavState,
    /// 是否被守卫改写（改写时使用 replaceState）
    pub redirected: bool,
}

/// **核心方法：守卫解析**
///
/// 公开路由直接放行；受保护路由交给 `guard::evaluate`。
pub fn resolve(target: AppRoute, session: &Session) -> Resolution {
    let Some(allowed) = target.allowed_roles() else {
        return Resolution {
            route: target,
            state: NavState::default(),
            redirected: false,
        };
    };

    let path = target.to_path();
    match evaluate(session.access_token.as_deref(), session.role, allowed, &path) {
        GuardDecision::Render => Resolution {
            route: target,
            state: NavState::default(),
            redirected: false,
        },
        GuardDecision::RedirectToLogin { return_to } => Resolution {
            route: AppRoute::auth_failure_redirect(),
            state: NavState {
                return_to: Some(return_to),
                notice: None,
            },
            redirected: true,
        },
        GuardDecision::RedirectToProfile { notice } => Resolution {
            route: AppRoute::role_failure_redirect(),
            state: NavState {
                return_to: None,
                notice: Some(notice),
            },
            redirected: true,
        },
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话信号由外部注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    nav_state: RwSignal<NavState>,
    session: Signal<Session>,
}

impl RouterService {
    fn new(session: Signal<Session>) -> Self {
        let target = AppRoute::from_path(&current_path());
        let resolution = resolve(target, &session.get_untracked());
        if resolution.redirected {
            log::info!("[Router] Initial route guarded, redirecting to {}", resolution.route);
            replace_history_state(&resolution.route.to_path());
        }

        Self {
            current_route: RwSignal::new(resolution.route),
            nav_state: RwSignal::new(resolution.state),
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> Signal<AppRoute> {
        self.current_route.into()
    }

    pub fn nav_state(&self) -> Signal<NavState> {
        self.nav_state.into()
    }

    /// 取出并清除提示（只显示一次）
    pub fn take_notice(&self) -> Option<String> {
        let mut notice = None;
        self.nav_state.update(|s| notice = s.notice.take());
        notice
    }

    /// 登录后的返回路径
    pub fn return_to(&self) -> Option<String> {
        self.nav_state.with_untracked(|s| s.return_to.clone())
    }

    /// 导航到指定路径（pushState）
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 导航到指定路径（replaceState）
    pub fn replace(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), false);
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let resolution = resolve(target, &self.session.get_untracked());
        if resolution.redirected {
            log::info!("[Router] Access denied. Redirecting to {}", resolution.route);
        }

        let path = resolution.route.to_path();
        if use_push && !resolution.redirected {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.apply(resolution);
    }

    fn apply(&self, resolution: Resolution) {
        self.nav_state.set(resolution.state);
        self.current_route.set(resolution.route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            let resolution = resolve(target, &router.session.get_untracked());
            if resolution.redirected {
                log::info!("[Router] popstate blocked. Redirecting to {}", resolution.route);
                replace_history_state(&resolution.route.to_path());
            }
            router.apply(resolution);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时重新执行守卫
    fn setup_session_guard(&self) {
        let router = *self;

        Effect::new(move |_| {
            let session = router.session.get();
            let route = router.current_route.get_untracked();
            let resolution = resolve(route, &session);
            if resolution.redirected {
                log::info!(
                    "[Router] Session changed, redirecting to {}",
                    resolution.route
                );
                replace_history_state(&resolution.route.to_path());
                router.apply(resolution);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_guard();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_route().get())
}

/// 站内链接，拦截点击并交给路由服务
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{KeyValueStore, SessionStore};
    use sqlab_shared::{Role, TokenPair};

    fn session(token: Option<&str>, role: Option<Role>) -> Session {
        Session {
            access_token: token.map(str::to_string),
            refresh_token: None,
            role,
        }
    }

    #[test]
    fn public_routes_pass_without_session() {
        let res = resolve(AppRoute::Exercises, &Session::default());
        assert_eq!(res.route, AppRoute::Exercises);
        assert!(!res.redirected);
    }

    #[test]
    fn anonymous_visit_to_protected_route_keeps_return_path() {
        let res = resolve(AppRoute::TeacherSubmissions(7), &Session::default());
        assert_eq!(res.route, AppRoute::Login);
        assert!(res.redirected);
        assert_eq!(
            res.state.return_to.as_deref(),
            Some("/teacher-dashboard/submissions/7")
        );
    }

    #[test]
    fn student_on_teacher_route_lands_on_profile_with_notice() {
        let res = resolve(
            AppRoute::TeacherStatistics,
            &session(Some("tok"), Some(Role::Student)),
        );
        assert_eq!(res.route, AppRoute::Profile);
        assert_eq!(res.state.notice.as_deref(), Some("Accès non autorisé"));
    }

    #[test]
    fn matching_role_renders_protected_route() {
        let res = resolve(
            AppRoute::StudentPerformance,
            &session(Some("tok"), Some(Role::Student)),
        );
        assert_eq!(res.route, AppRoute::StudentPerformance);
        assert_eq!(res.state, NavState::default());
    }

    #[test]
    fn logout_on_protected_route_is_redirected() {
        let store = SessionStore::in_memory();
        store.save_tokens(&TokenPair {
            access: "acc".to_string(),
            refresh: "ref".to_string(),
        });
        store.save_role(Role::Teacher);
        KeyValueStore::set(&*store.backend(), "darkMode", "true");

        let route = AppRoute::TeacherDashboard;
        assert!(!resolve(route.clone(), &store.snapshot()).redirected);

        // 注销：先清空存储，再用新快照重新解析当前路由
        store.clear_all();
        let res = resolve(route, &store.snapshot());
        assert_eq!(res.route, AppRoute::Login);
        assert_eq!(res.state.return_to.as_deref(), Some("/teacher-dashboard"));
        assert_eq!(KeyValueStore::get(&*store.backend(), "darkMode").as_deref(), Some("true"));
    }
}
