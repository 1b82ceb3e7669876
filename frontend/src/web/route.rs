//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由，以及受保护路由的角色白名单。

use std::fmt::Display;

use sqlab_shared::Role;

use crate::error::{ClientError, ClientErrorKind};

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页
    #[default]
    Home,
    Login,
    Register,
    Profile,
    Exercises,
    Submit,
    /// 学生：我的提交
    Submissions,
    /// 学生：成绩曲线
    StudentPerformance,
    /// 教师：练习管理
    TeacherDashboard,
    /// 教师：某个练习的提交
    TeacherSubmissions(u64),
    /// 教师：统计
    TeacherStatistics,
    /// 页面未找到（保留原始路径用于显示）
    NotFound(String),
}

/// 角色白名单
///
/// 每个受保护路由都有非空白名单；公开路由返回 None。
const STUDENT_ONLY: &[Role] = &[Role::Student];
const TEACHER_ONLY: &[Role] = &[Role::Teacher];

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 末尾斜杠被忽略，与 `/login/` 和 `/login` 视为同一路由。
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or(path);
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/profile" => Self::Profile,
            "/exercises" => Self::Exercises,
            "/submit" => Self::Submit,
            "/submissions" => Self::Submissions,
            "/student-performance" => Self::StudentPerformance,
            "/teacher-dashboard" => Self::TeacherDashboard,
            "/teacher-statistics" => Self::TeacherStatistics,
            other => match other
                .strip_prefix("/teacher-dashboard/submissions/")
                .and_then(|id| id.parse::<u64>().ok())
            {
                Some(id) => Self::TeacherSubmissions(id),
                None => Self::NotFound(path.to_string()),
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Exercises => "/exercises".to_string(),
            Self::Submit => "/submit".to_string(),
            Self::Submissions => "/submissions".to_string(),
            Self::StudentPerformance => "/student-performance".to_string(),
            Self::TeacherDashboard => "/teacher-dashboard".to_string(),
            Self::TeacherSubmissions(id) => format!("/teacher-dashboard/submissions/{}", id),
            Self::TeacherStatistics => "/teacher-statistics".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// **核心守卫数据：路由允许的角色**
    ///
    /// None 表示公开路由。
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Submissions | Self::StudentPerformance => Some(STUDENT_ONLY),
            Self::TeacherDashboard | Self::TeacherSubmissions(_) | Self::TeacherStatistics => {
                Some(TEACHER_ONLY)
            }
            Self::Home
            | Self::Login
            | Self::Register
            | Self::Profile
            | Self::Exercises
            | Self::Submit
            | Self::NotFound(_) => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.allowed_roles().is_some()
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 角色不符时的重定向目标
    pub fn role_failure_redirect() -> Self {
        Self::Profile
    }

    /// 登录成功且没有返回路径时的目标
    pub fn auth_success_redirect() -> Self {
        Self::Profile
    }

    /// 请求因本地没有令牌而未发出时转到登录页，不显示错误
    pub fn redirect_for(err: &ClientError) -> Option<Self> {
        match err.kind {
            ClientErrorKind::MissingSession => Some(Self::auth_failure_redirect()),
            _ => None,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
