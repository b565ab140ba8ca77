//! 认证模块
//!
//! 把核心库的 [`SessionStore`] 接入 Leptos：
//! 会话快照镜像进信号，路由服务通过注入的状态信号检查认证状态。

use crate::web::{BrowserTokenStore, FetchHttpClient, html_data};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::controller::AuthFailureHook;
use rbac_console::{ApiClient, AuthStatus, ClientConfig, Session, SessionStore, TokenStore};
use std::rc::Rc;

pub type Api = ApiClient<FetchHttpClient>;
pub type Store = SessionStore<FetchHttpClient>;

/// 认证上下文
///
/// 只含 Copy 句柄，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub session: ReadSignal<Session>,
    store: StoredValue<Store, LocalStorage>,
}

impl AuthContext {
    /// 配置取自 `<html data-api-url data-token-key>`，缺省时用内置默认值
    pub fn new() -> Self {
        let config = ClientConfig::from_lookup(html_data);
        log::info!("[Auth] API base {}", config.base_url);

        let tokens: Rc<dyn TokenStore> = Rc::new(BrowserTokenStore::new(config.token_key.clone()));
        let store = SessionStore::new(ApiClient::new(FetchHttpClient, config, tokens));

        let (session, set_session) = signal(store.snapshot());
        store.subscribe(move |s| set_session.set(s.clone()));

        Self {
            session,
            store: StoredValue::new_local(store),
        }
    }

    /// 路由守卫使用的状态信号
    pub fn status_signal(&self) -> Signal<AuthStatus> {
        let session = self.session;
        Signal::derive(move || session.with(Session::status))
    }

    pub fn store(&self) -> Store {
        self.store.get_value()
    }

    pub fn api(&self) -> Api {
        self.store.with_value(|s| s.api().clone())
    }

    /// 页面控制器遇到 401 时注销
    pub fn auth_failure_hook(&self) -> AuthFailureHook {
        self.store.with_value(AuthFailureHook::expire_session)
    }

    /// 注销。导航由路由服务监听会话状态自动处理。
    pub fn logout(&self) {
        self.store.with_value(|s| s.logout());
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动令牌校验
///
/// loading 状态在这里同步进入，之后的 profile 请求在后台完成。
pub fn init_auth(ctx: &AuthContext) {
    let pending = ctx.store.with_value(|s| s.init());
    spawn_local(pending);
}
