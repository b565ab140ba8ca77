//! RBAC 管理控制台的核心逻辑
//!
//! 不依赖 DOM：HTTP 与令牌存储都通过 trait 注入，
//! 浏览器端由 `rbac-console-frontend` 提供实现，测试中使用 mock。
//!
//! - [`api`]：后端 REST 接口的类型化客户端
//! - [`session`]：令牌、当前用户与管理员标记
//! - [`guard`]：路由表与访问控制决策
//! - [`controller`]：各页面的数据流

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod guard;
pub mod observable;
pub mod request;
pub mod session;
pub mod storage;

#[cfg(test)]
mod testing;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, FormError, ValidationError};
pub use guard::{AppRoute, AuthStatus};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use session::{Session, SessionStore};
pub use storage::{MemoryTokenStore, TokenStore};

pub use rbac_console_shared as shared;
