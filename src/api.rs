//! 后端 API 客户端
//!
//! 每个后端操作对应一个方法。客户端不持有可变状态，也不写存储：
//! 令牌只在发请求时从 [`TokenStore`] 读取。

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::storage::TokenStore;
use rbac_console_shared::protocol::{
    ApiRequest, AssignRoleRequest, AssignRoleResponse, AuthResponse, Confirmation,
    DeleteRoleRequest, GetRoleRequest, ListRolesRequest, ListUsersRequest, LoginRequest,
    ProfileRequest, ProfileResponse, ProfileUpdate, RoleDraft, SignupRequest, UpdateRoleRequest,
};
use rbac_console_shared::{Role, User};
use serde::Deserialize;
use std::rc::Rc;

// 每个操作的兜底错误文案
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const PROFILE_FAILED: &str = "Failed to fetch profile";
pub const UPDATE_PROFILE_FAILED: &str = "Failed to update profile. Please try again.";
pub const LIST_ROLES_FAILED: &str = "Failed to fetch roles";
pub const GET_ROLE_FAILED: &str = "Failed to fetch role";
pub const CREATE_ROLE_FAILED: &str = "Failed to create role";
pub const UPDATE_ROLE_FAILED: &str = "Failed to update role";
pub const DELETE_ROLE_FAILED: &str = "Failed to delete role";
pub const LIST_USERS_FAILED: &str = "Failed to fetch users";
pub const ASSIGN_ROLE_FAILED: &str = "Failed to assign role";

/// 后端错误响应体里我们唯一关心的字段
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// 从错误响应体中取出后端提供的 message
fn backend_message(resp: &HttpResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&resp.body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

pub struct ApiClient<C> {
    http: Rc<C>,
    config: Rc<ClientConfig>,
    tokens: Rc<dyn TokenStore>,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(http: C, config: ClientConfig, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            http: Rc::new(http),
            config: Rc::new(config),
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 与会话共享的令牌存储
    pub fn tokens(&self) -> Rc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// **核心方法：发送请求并统一错误形态**
    ///
    /// 流程：构建 -> 附加令牌 -> 发送 -> 检查状态 -> 解析
    async fn call<R: ApiRequest>(&self, req: &R, fallback: &str) -> ApiResult<R::Response> {
        let url = self.config.url(&req.path());
        let mut http_req =
            HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");

        if R::AUTH {
            if let Some(token) = self.tokens.get() {
                http_req = http_req.with_header("Authorization", &format!("Bearer {}", token));
            }
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_value(req).map_err(|e| {
                log::error!("[Api] {} {}: failed to encode body: {}", R::METHOD.as_str(), url, e);
                ApiError::decode(fallback)
            })?;
            http_req = http_req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        log::debug!("[Api] {} {}", R::METHOD.as_str(), url);

        let resp = self.http.send(http_req).await.map_err(|e| {
            log::error!("[Api] {} {}: {}", R::METHOD.as_str(), url, e);
            ApiError::network(fallback)
        })?;

        if !resp.ok() {
            let message = backend_message(&resp).unwrap_or_else(|| fallback.to_string());
            log::warn!(
                "[Api] {} {} -> {}: {}",
                R::METHOD.as_str(),
                url,
                resp.status,
                message
            );
            return Err(ApiError::status(resp.status, message));
        }

        resp.json::<R::Response>().map_err(|e| {
            log::error!("[Api] {} {}: invalid payload: {}", R::METHOD.as_str(), url, e);
            ApiError::decode(fallback)
        })
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call(&req, LOGIN_FAILED).await
    }

    pub async fn register(&self, signup: &SignupRequest) -> ApiResult<AuthResponse> {
        self.call(signup, REGISTER_FAILED).await
    }

    pub async fn profile(&self) -> ApiResult<ProfileResponse> {
        self.call(&ProfileRequest, PROFILE_FAILED).await
    }

    /// 返回后端给出的已更新字段（通常是一个对象）
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<serde_json::Value> {
        self.call(update, UPDATE_PROFILE_FAILED).await
    }

    // =========================================================
    // 角色
    // =========================================================

    pub async fn list_roles(&self) -> ApiResult<Vec<Role>> {
        self.call(&ListRolesRequest, LIST_ROLES_FAILED).await
    }

    pub async fn get_role(&self, id: &str) -> ApiResult<Role> {
        let req = GetRoleRequest { id: id.to_string() };
        self.call(&req, GET_ROLE_FAILED).await
    }

    pub async fn create_role(&self, draft: &RoleDraft) -> ApiResult<Role> {
        self.call(draft, CREATE_ROLE_FAILED).await
    }

    pub async fn update_role(&self, id: &str, draft: &RoleDraft) -> ApiResult<Role> {
        let req = UpdateRoleRequest {
            id: id.to_string(),
            draft: draft.clone(),
        };
        self.call(&req, UPDATE_ROLE_FAILED).await
    }

    pub async fn delete_role(&self, id: &str) -> ApiResult<Option<Confirmation>> {
        let req = DeleteRoleRequest { id: id.to_string() };
        self.call(&req, DELETE_ROLE_FAILED).await
    }

    // =========================================================
    // 用户
    // =========================================================

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.call(&ListUsersRequest, LIST_USERS_FAILED).await
    }

    pub async fn assign_role(&self, user_id: &str, role_id: &str) -> ApiResult<AssignRoleResponse> {
        let req = AssignRoleRequest {
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        };
        self.call(&req, ASSIGN_ROLE_FAILED).await
    }
}
