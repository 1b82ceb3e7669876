//! Smart Query 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `session` / `auth`: 会话存储与认证上下文
//! - `web::route` / `web::guard` / `web::router`: 路由、守卫与路由服务
//! - `api`: 后端接口客户端
//! - `theme`: 明暗主题
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod error;
mod nav;
mod session;
mod theme;
mod validation;
mod components {
    pub mod common;
    pub mod exercise_list;
    pub mod home;
    pub mod login;
    pub mod nav_bar;
    pub mod profile;
    pub mod register;
    pub mod student_performance;
    pub mod submission_form;
    pub mod submission_list;
    pub mod teacher_dashboard;
    pub mod teacher_statistics;
    pub mod teacher_submissions;
}

// 浏览器 API 封装与路由
pub(crate) mod web {
    pub mod dom;
    pub mod guard;
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod task;
}

use leptos::prelude::*;

use crate::auth::SessionContext;
use crate::components::exercise_list::ExerciseListPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::nav_bar::NavBar;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::student_performance::StudentPerformancePage;
use crate::components::submission_form::SubmissionFormPage;
use crate::components::submission_list::SubmissionListPage;
use crate::components::teacher_dashboard::TeacherDashboardPage;
use crate::components::teacher_statistics::TeacherStatisticsPage;
use crate::components::teacher_submissions::TeacherSubmissionsPage;
use crate::config::AppConfig;
use crate::session::SessionStore;
use crate::theme::{Palette, ThemeContext, theme_name};
use web::dom;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::storage::BrowserStorage;

/// 路由匹配函数
///
/// 守卫已在路由服务中完成，这里只负责把路由映射为视图。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Exercises => view! { <ExerciseListPage /> }.into_any(),
        AppRoute::Submit => view! { <SubmissionFormPage /> }.into_any(),
        AppRoute::Submissions => view! { <SubmissionListPage /> }.into_any(),
        AppRoute::StudentPerformance => view! { <StudentPerformancePage /> }.into_any(),
        AppRoute::TeacherDashboard => view! { <TeacherDashboardPage /> }.into_any(),
        AppRoute::TeacherSubmissions(id) => {
            view! { <TeacherSubmissionsPage exercise_id=id /> }.into_any()
        }
        AppRoute::TeacherStatistics => view! { <TeacherStatisticsPage /> }.into_any(),
        AppRoute::NotFound(path) => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">{format!("Page non trouvée : {}", path)}</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话存储与配置
    let store = SessionStore::new(BrowserStorage);
    let config = AppConfig::resolve(&*store.backend());
    log::info!("[Api] base url {}", config.api_base_url);

    // 2. 主题与会话上下文（共享同一存储后端）
    let theme = ThemeContext::new(store.backend());
    provide_context(theme);
    theme.resolve(dom::prefers_dark());

    let session_ctx = SessionContext::new(store, config);
    provide_context(session_ctx);

    let session = session_ctx.session();
    let dark_mode = theme.dark_mode();

    Effect::new(move |_| {
        if let Some(dark) = dark_mode.get() {
            dom::set_document_theme(theme_name(dark));
        }
    });

    // 3. 主题解析完成前不渲染页面
    view! {
        <Show
            when=move || dark_mode.get().is_some()
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen">"Chargement du thème..."</div>
            }
        >
            <div
                class="min-h-screen bg-base-200"
                style=move || Palette::for_mode(dark_mode.get().unwrap_or(false)).css_vars()
            >
                <Router session=session>
                    <NavBar />
                    <RouterOutlet matcher=route_matcher />
                </Router>
            </div>
        </Show>
    }
}
