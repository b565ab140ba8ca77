//! 路由定义与守卫 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别以及导航决策。

use std::fmt::Display;

/// 会话的三态视图（由 [`crate::session::Session::status`] 派生）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    /// 启动时的令牌校验尚未完成
    Loading,
    Authenticated {
        admin: bool,
    },
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { admin: true })
    }
}

/// 路由的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 登录、注册：已认证用户应离开
    Public,
    Authenticated,
    Admin,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 根路径，按认证状态分流
    #[default]
    Root,
    Login,
    Register,
    Dashboard,
    Profile,
    Users,
    Roles,
    /// 未知路径
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/users" => Self::Users,
            "/roles" => Self::Roles,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Users => "/users",
            Self::Roles => "/roles",
            Self::NotFound => "/404",
        }
    }

    /// 访问级别。Root 与 NotFound 只做重定向，没有自己的级别。
    pub fn access(&self) -> Option<Access> {
        match self {
            Self::Login | Self::Register => Some(Access::Public),
            Self::Dashboard | Self::Profile => Some(Access::Authenticated),
            Self::Users | Self::Roles => Some(Access::Admin),
            Self::Root | Self::NotFound => None,
        }
    }

    /// 已认证用户的默认落地页
    pub fn landing() -> Self {
        Self::Dashboard
    }

    /// 未认证时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标页面
    Render,
    /// 会话仍在校验，显示占位
    Wait,
    Redirect(AppRoute),
}

/// **核心守卫逻辑**
///
/// 纯函数：只看会话状态和目标路由。
pub fn decide(status: AuthStatus, route: AppRoute) -> GuardDecision {
    use GuardDecision::*;

    if status == AuthStatus::Loading && route != AppRoute::NotFound {
        return Wait;
    }

    match (route, route.access()) {
        (AppRoute::NotFound, _) => Redirect(AppRoute::Root),
        (AppRoute::Root, _) => {
            if status.is_authenticated() {
                Redirect(AppRoute::landing())
            } else {
                Redirect(AppRoute::auth_failure_redirect())
            }
        }
        (_, Some(Access::Public)) => {
            if status.is_authenticated() {
                Redirect(AppRoute::landing())
            } else {
                Render
            }
        }
        (_, Some(Access::Authenticated)) => {
            if status.is_authenticated() {
                Render
            } else {
                Redirect(AppRoute::auth_failure_redirect())
            }
        }
        (_, Some(Access::Admin)) => {
            if !status.is_authenticated() {
                Redirect(AppRoute::auth_failure_redirect())
            } else if status.is_admin() {
                Render
            } else {
                // 已登录但不是管理员：回到落地页
                Redirect(AppRoute::landing())
            }
        }
        (_, None) => Redirect(AppRoute::Root),
    }
}

/// 导航的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(AppRoute),
    Wait(AppRoute),
}

impl Resolution {
    pub fn route(&self) -> AppRoute {
        match self {
            Resolution::Render(r) | Resolution::Wait(r) => *r,
        }
    }
}

/// 连续应用守卫直到得到可渲染（或需等待）的路由
pub fn resolve(status: AuthStatus, requested: AppRoute) -> Resolution {
    let mut route = requested;
    // 重定向链最长为 NotFound -> Root -> Login/Dashboard
    for _ in 0..4 {
        match decide(status, route) {
            GuardDecision::Render => return Resolution::Render(route),
            GuardDecision::Wait => return Resolution::Wait(route),
            GuardDecision::Redirect(next) => route = next,
        }
    }
    log::error!("[Guard] Redirect loop starting at {}", requested);
    Resolution::Wait(route)
}

#[cfg(test)]
mod tests;
