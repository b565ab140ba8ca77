//! RBAC 管理控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::router`: 路由服务（核心引擎），守卫规则来自核心库
//! - `auth`: 会话状态接入
//! - `components`: UI 组件层，页面逻辑在核心库的控制器里

mod auth;
mod components {
    pub mod dashboard;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod profile;
    pub mod register;
    pub mod roles;
    pub mod users;
}
mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::roles::RolesPage;
use crate::components::users::UsersPage;

use leptos::prelude::*;
use rbac_console::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
/// Root 与 NotFound 在守卫阶段已被重定向，这里只是兜底。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Users => view! { <UsersPage /> }.into_any(),
        AppRoute::Roles => view! { <RolesPage /> }.into_any(),
        AppRoute::Root | AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 校验已保存的令牌（同步进入 loading，路由在此期间等待）
    init_auth(&auth_ctx);

    // 3. 会话状态信号注入路由服务
    let status = auth_ctx.status_signal();

    view! {
        <Router status=status>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
