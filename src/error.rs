use thiserror::Error;

// =========================================================
// 错误类型枚举
// =========================================================

/// API 调用失败的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 没有拿到 HTTP 响应（断网、CORS、DNS 等）
    Network,
    /// 后端返回了非 2xx 状态码
    Status(u16),
    /// 2xx 但响应体无法解析
    Decode,
}

/// 网络或服务端错误
///
/// 所有失败都在 API 客户端边界被转换为这个类型，
/// `message` 是可直接展示给用户的文本：后端提供了 `message` 字段就用它，
/// 否则使用每个操作固定的兜底文案。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP 状态码（网络错误没有状态码）
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Status(code) => Some(code),
            _ => None,
        }
    }

    /// 401：令牌失效
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 客户端表单校验错误，在发出任何请求之前检测
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    IncompleteForm,
    #[error("Role name is required")]
    MissingRoleName,
    #[error("Please select a role")]
    NoRoleSelected,
    #[error("Age must be a positive number")]
    InvalidAge,
}

/// 表单提交的结果错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FormError {
    /// 是否在发请求之前就被拦下
    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }
}
