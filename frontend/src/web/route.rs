//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由、其属性，以及守卫决策。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::NotFound => "/404",
        }
    }

    /// 该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// 已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功且没有记录原始目标时的默认落点
    pub fn default_after_login() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫决策
///
/// 导航请求经过守卫后的三种结果。被拒绝时带上原始目标，
/// 登录成功后路由服务用它把用户送回最初想去的页面。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行，正常加载目标路由
    Allow,
    /// 未认证访问受保护路由：记录目标并重定向到登录页
    DenyToLogin { requested: AppRoute },
    /// 已认证访问登录页：重定向到默认落点
    RedirectAuthenticated,
}

/// **核心守卫逻辑**：给定目标路由与认证状态，产出导航决策
pub fn guard(target: AppRoute, is_authenticated: bool) -> GuardDecision {
    if target.requires_auth() && !is_authenticated {
        return GuardDecision::DenyToLogin { requested: target };
    }
    if target.should_redirect_when_authenticated() && is_authenticated {
        return GuardDecision::RedirectAuthenticated;
    }
    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(AppRoute::Dashboard.to_path(), "/dashboard");
        assert_eq!(AppRoute::from_path(AppRoute::Dashboard.to_path()), AppRoute::Dashboard);
    }

    #[test]
    fn unauthenticated_access_is_denied_with_destination_recorded() {
        let decision = guard(AppRoute::Dashboard, false);
        assert_eq!(
            decision,
            GuardDecision::DenyToLogin {
                requested: AppRoute::Dashboard
            }
        );
    }

    #[test]
    fn authenticated_users_leave_the_login_page() {
        assert_eq!(guard(AppRoute::Login, true), GuardDecision::RedirectAuthenticated);
    }

    #[test]
    fn allowed_cases_pass_through_unchanged() {
        assert_eq!(guard(AppRoute::Login, false), GuardDecision::Allow);
        assert_eq!(guard(AppRoute::Dashboard, true), GuardDecision::Allow);
        assert_eq!(guard(AppRoute::NotFound, false), GuardDecision::Allow);
        assert_eq!(guard(AppRoute::NotFound, true), GuardDecision::Allow);
    }

    #[test]
    fn login_fallback_is_the_dashboard() {
        assert_eq!(AppRoute::default_after_login(), AppRoute::Dashboard);
        assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
    }
}
