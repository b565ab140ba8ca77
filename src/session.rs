//! 会话模块
//!
//! 持有认证令牌与当前用户，管理令牌的持久化，并派生管理员标记。
//! 会话状态只能通过这里列出的操作修改；视图层和页面控制器只读。

use crate::api::{ApiClient, UPDATE_PROFILE_FAILED};
use crate::error::{ApiError, ApiResult};
use crate::guard::AuthStatus;
use crate::observable::Observable;
use crate::request::HttpClient;
use crate::storage::TokenStore;
use rbac_console_shared::protocol::{AuthResponse, ProfileUpdate, SignupRequest};
use rbac_console_shared::{User, is_admin_role};
use std::future::Future;
use std::rc::Rc;

/// 会话状态
///
/// 字段只能经由 [`SessionStore`] 的操作改变，以保持以下不变式：
/// - `is_authenticated` 当且仅当令牌存在且已被后端确认过
/// - `is_admin` 当且仅当解析后的角色名等于 `"admin"`
/// - `loading` 只在启动时的令牌校验期间为 true
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    token: Option<String>,
    current_user: Option<User>,
    is_authenticated: bool,
    is_admin: bool,
    loading: bool,
}

impl Session {
    fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            is_admin: is_admin_role(user.role.as_ref()),
            current_user: Some(user),
            is_authenticated: true,
            loading: false,
        }
    }

    fn checking(token: String) -> Self {
        Self {
            token: Some(token),
            loading: true,
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// 路由守卫使用的三态视图
    pub fn status(&self) -> AuthStatus {
        if self.loading {
            AuthStatus::Loading
        } else if self.is_authenticated {
            AuthStatus::Authenticated {
                admin: self.is_admin,
            }
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

/// 会话存储
///
/// 克隆开销很小，所有克隆共享同一份状态。
pub struct SessionStore<C> {
    api: ApiClient<C>,
    tokens: Rc<dyn TokenStore>,
    state: Observable<Session>,
}

impl<C> Clone for SessionStore<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            tokens: self.tokens.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: HttpClient> SessionStore<C> {
    /// 与 API 客户端共享同一个令牌存储
    pub fn new(api: ApiClient<C>) -> Self {
        let tokens = api.tokens();
        Self {
            api,
            tokens,
            state: Observable::new(Session::default()),
        }
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub fn snapshot(&self) -> Session {
        self.state.get()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.with(Session::status)
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.with(|s| s.current_user.clone())
    }

    /// 每次状态变化后收到一份快照（订阅时先收到当前状态）
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.state.subscribe(listener);
    }

    /// 启动时的令牌校验
    ///
    /// 调用时立即同步进入 loading（有持久化令牌时），路由守卫因此不会先看到未认证状态；
    /// 返回的 future 请求 profile：成功则认证，失败或响应中没有用户则清除令牌。
    /// 没有令牌时不发请求。
    pub fn init(&self) -> impl Future<Output = ()> + 'static
    where
        C: 'static,
    {
        let token = self.tokens.get();
        match &token {
            Some(token) => self.state.set(Session::checking(token.clone())),
            None => {
                log::info!("[Session] No stored token");
                self.state.set(Session::default());
            }
        }

        let store = self.clone();
        async move {
            if let Some(token) = token {
                store.validate(token).await;
            }
        }
    }

    async fn validate(&self, token: String) {
        match self.api.profile().await {
            Ok(resp) => match resp.user {
                Some(user) => {
                    log::info!("[Session] Token validated for {}", user.email);
                    self.state.set(Session::authenticated(token, user));
                }
                None => {
                    log::warn!("[Session] Profile response without user, clearing token");
                    self.clear();
                }
            },
            Err(e) => {
                log::warn!("[Session] Token validation failed: {}", e);
                self.clear();
            }
        }
    }

    /// 登录。失败时会话保持不变。
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        let resp = self.api.login(email, password).await?;
        self.establish(resp);
        Ok(())
    }

    /// 注册。成功后新账号直接视为已登录。
    pub async fn register(&self, signup: &SignupRequest) -> ApiResult<()> {
        let resp = self.api.register(signup).await?;
        self.establish(resp);
        Ok(())
    }

    fn establish(&self, resp: AuthResponse) {
        self.tokens.set(&resp.token);
        log::info!("[Session] Authenticated as {}", resp.user.email);
        self.state.set(Session::authenticated(resp.token, resp.user));
    }

    /// 注销：同步清除令牌和全部会话字段，不发请求
    pub fn logout(&self) {
        log::info!("[Session] Logged out");
        self.clear();
    }

    fn clear(&self) {
        self.tokens.clear();
        self.state.set(Session::default());
    }

    /// 携带令牌的请求返回 401 时按注销处理
    ///
    /// 返回会话是否因此被清除。
    pub fn expire(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() || !self.state.with(Session::is_authenticated) {
            return false;
        }
        log::warn!("[Session] Token rejected by backend, signing out");
        self.clear();
        true
    }

    /// 更新个人资料，并把响应字段浅合并进当前用户
    ///
    /// 认证状态（包括管理员标记）保持登录或启动校验时的结果。
    /// 响应不是对象时视为没有字段更新；合并结果无法解析时返回解码错误，会话不变。
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        let resp = self.api.update_profile(update).await?;
        let fields = match resp {
            serde_json::Value::Object(map) => map,
            other => {
                log::warn!("[Session] Unexpected profile update payload: {}", other);
                serde_json::Map::new()
            }
        };

        let base = self.current_user().unwrap_or_default();
        let merged = base.merged_with(&fields).ok_or_else(|| {
            log::error!("[Session] Profile update fields could not be merged");
            ApiError::decode(UPDATE_PROFILE_FAILED)
        })?;

        self.state.update(|s| s.current_user = Some(merged));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
