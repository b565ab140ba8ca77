// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，宿主环境没有提供对应配置项时使用
pub const DEFAULT_API_BASE_URL: &str = "https://role-based-backend-gamma.vercel.app/api";
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// 配置项名称
pub const API_URL_VAR: &str = "api-url";
pub const TOKEN_KEY_VAR: &str = "token-key";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端 API 根路径（不带结尾的 `/`）
    pub base_url: String,
    /// 持久化令牌使用的存储键
    pub token_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// 从任意键值来源读取配置，读不到或为空就用默认值
    ///
    /// 浏览器中来源是 `<html data-*>` 属性，测试中是一个 HashMap。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: normalize_base_url(
                read(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            ),
            token_key: read(TOKEN_KEY_VAR).unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
        }
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
