// =========================================================
// 测试工具: MockHttpClient 与测试数据
// =========================================================

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse, TransportError};
use crate::storage::{MemoryTokenStore, TokenStore};
use futures::channel::oneshot;
use rbac_console_shared::{Permission, Role, RoleRef, User};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const BASE_URL: &str = "http://api.test";

enum Scripted {
    Reply(u16, String),
    Fail(String),
    Deferred(oneshot::Receiver<HttpResponse>),
}

/// 按 (方法, URL) 排队的脚本化响应。
///
/// 队列只剩最后一个即时响应时会被重复使用；没有脚本的请求返回 404。
pub struct MockHttpClient {
    routes: RefCell<HashMap<(String, String), VecDeque<Scripted>>>,
    /// 记录发出的全部请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            routes: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .borrow_mut()
            .entry((method.as_str().to_string(), format!("{}{}", BASE_URL, path)))
            .or_default()
            .push_back(scripted);
    }

    pub fn mock_response(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Scripted::Reply(status, body.to_string()));
    }

    pub fn mock_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(method, path, Scripted::Reply(status, body.to_string()));
    }

    pub fn mock_transport_error(&self, method: HttpMethod, path: &str) {
        self.push(method, path, Scripted::Fail("connection refused".to_string()));
    }

    /// 响应由测试手动放行，用于控制并发请求的完成顺序
    pub fn mock_deferred(&self, method: HttpMethod, path: &str) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Deferred(rx));
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// "METHOD path" 形式的请求记录，便于断言
    pub fn request_log(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| {
                format!(
                    "{} {}",
                    r.method.as_str(),
                    r.url.trim_start_matches(BASE_URL)
                )
            })
            .collect()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    fn next(&self, key: &(String, String)) -> Option<Scripted> {
        let mut routes = self.routes.borrow_mut();
        let queue = routes.get_mut(key)?;
        if queue.len() > 1 {
            return queue.pop_front();
        }
        match queue.front()? {
            Scripted::Reply(status, body) => Some(Scripted::Reply(*status, body.clone())),
            Scripted::Fail(msg) => Some(Scripted::Fail(msg.clone())),
            Scripted::Deferred(_) => queue.pop_front(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (req.method.as_str().to_string(), req.url.clone());
        self.requests.borrow_mut().push(req);

        match self.next(&key) {
            Some(Scripted::Reply(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Scripted::Fail(msg)) => Err(TransportError::new(msg)),
            Some(Scripted::Deferred(rx)) => rx
                .await
                .map_err(|_| TransportError::new("deferred response dropped")),
            None => Ok(HttpResponse::new(404, "Not Found")),
        }
    }
}

/// 构建指向 mock 后端的客户端，可选预置令牌
pub fn mock_api(token: Option<&str>) -> (ApiClient<MockHttpClient>, Rc<MemoryTokenStore>) {
    let tokens = Rc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let store: Rc<dyn TokenStore> = tokens.clone();
    let api = ApiClient::new(MockHttpClient::new(), ClientConfig::new(BASE_URL), store);
    (api, tokens)
}

pub fn role(id: &str, name: &str, permissions: &[&str]) -> Role {
    Role {
        id: id.to_string(),
        name: name.to_string(),
        permissions: permissions.iter().map(|p| Permission::new(*p)).collect(),
    }
}

pub fn user(id: &str, name: &str, role: Option<RoleRef>) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        gender: Some("other".to_string()),
        age: Some(30),
        role,
    }
}

pub fn named(role: &str) -> Option<RoleRef> {
    Some(RoleRef::Name(role.to_string()))
}
