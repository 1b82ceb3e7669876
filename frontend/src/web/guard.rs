//! 路由守卫
//!
//! 纯函数：根据缓存的令牌与角色决定渲染还是重定向。
//! 这只是用户体验层面的拦截，真正的权限由服务端在每个 API 上校验。

use sqlab_shared::Role;

pub const UNAUTHORIZED_NOTICE: &str = "Accès non autorisé";

/// 守卫的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// 无令牌：跳转登录页，并记录原路径以便登录后返回
    RedirectToLogin { return_to: String },
    /// 角色缺失或不在白名单中：跳转个人页并附带提示
    RedirectToProfile { notice: String },
}

/// **核心守卫逻辑**
///
/// 顺序固定：先检查令牌是否存在，再检查角色是否在白名单中。
/// 令牌只检查存在性，不检查是否过期。
pub fn evaluate(
    access_token: Option<&str>,
    role: Option<Role>,
    allowed: &[Role],
    current_path: &str,
) -> GuardDecision {
    if access_token.is_none_or(str::is_empty) {
        return GuardDecision::RedirectToLogin {
            return_to: current_path.to_string(),
        };
    }
    match role {
        Some(role) if allowed.contains(&role) => GuardDecision::Render,
        _ => GuardDecision::RedirectToProfile {
            notice: UNAUTHORIZED_NOTICE.to_string(),
        },
    }
}
