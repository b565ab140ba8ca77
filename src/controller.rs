//! 页面控制器
//!
//! 每个页面的数据流都遵循同一模式：
//! - 挂载时通过 API 客户端拉取集合
//! - 本地列表镜像最近一次成功的拉取结果
//! - 变更成功后按 [`SyncStrategy`] 刷新：整体重拉或就地修补
//! - 成功给出短暂提示，失败给出内联错误，绝不 panic
//!
//! | 资源 | 变更 | 策略 |
//! |---|---|---|
//! | 角色 | 创建 / 更新 | Refetch |
//! | 角色 | 删除 | Patch（按 id 移除） |
//! | 用户 | 分配角色 | Patch（替换该用户的 role） |

use crate::error::{ApiError, ApiResult, ValidationError};
use crate::request::HttpClient;
use crate::session::SessionStore;
use rbac_console_shared::{Role, User};
use std::future::Future;
use std::rc::Rc;

pub mod auth_forms;
pub mod dashboard;
pub mod profile;
pub mod roles;
pub mod users;

pub use auth_forms::{LoginForm, RegisterForm};
pub use dashboard::DashboardController;
pub use profile::ProfileController;
pub use roles::RolesController;
pub use users::UsersController;

// =========================================================
// 提示消息
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 短暂显示的提示（toast）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

// =========================================================
// 本地集合
// =========================================================

/// 能按 id 定位的资源
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Role {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

/// 镜像最近一次成功拉取的本地列表
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Collection<T> {
    /// 页面挂载即开始加载，所以初始为 loading
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl<T: Keyed> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// 失败时保留上一次成功的列表
    pub fn finish_load(&mut self, result: ApiResult<Vec<T>>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => self.error = Some(e.message),
        }
    }

    /// 按 id 移除，返回移除的条数
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        before - self.items.len()
    }

    /// 就地修改匹配的条目，其余条目不动
    pub fn patch(&mut self, key: &str, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }
}

// =========================================================
// 变更后的同步策略
// =========================================================

/// 变更成功后如何让本地列表与后端一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// 重新拉取整个集合：一致性最好，多一次请求
    Refetch,
    /// 用变更的响应就地修补：不发请求，窗口期内可能与后端不一致
    Patch,
}

impl SyncStrategy {
    pub async fn apply<F, Fut, P>(self, refetch: F, patch: P)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
        P: FnOnce(),
    {
        match self {
            SyncStrategy::Refetch => refetch().await,
            SyncStrategy::Patch => patch(),
        }
    }
}

// =========================================================
// 401 回调
// =========================================================

/// 控制器遇到 401 时的回调，通常接到 [`SessionStore::expire`]
#[derive(Clone, Default)]
pub struct AuthFailureHook(Option<Rc<dyn Fn(&ApiError)>>);

impl AuthFailureHook {
    pub fn new(f: impl Fn(&ApiError) + 'static) -> Self {
        Self(Some(Rc::new(f)))
    }

    /// 把 401 转交给会话
    pub fn expire_session<C: HttpClient + 'static>(session: &SessionStore<C>) -> Self {
        let session = session.clone();
        Self::new(move |err| {
            session.expire(err);
        })
    }

    pub fn notify(&self, err: &ApiError) {
        if err.is_unauthorized() {
            if let Some(f) = &self.0 {
                f(err);
            }
        }
    }
}

// =========================================================
// 表单辅助
// =========================================================

/// 任一必填字段为空（忽略首尾空白）
pub(crate) fn any_blank<S: AsRef<str>>(fields: &[S]) -> bool {
    fields.iter().any(|f| f.as_ref().trim().is_empty())
}

/// 年龄输入框的文本必须是正整数
pub(crate) fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(age) if age > 0 => Ok(age),
        _ => Err(ValidationError::InvalidAge),
    }
}
