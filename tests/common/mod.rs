// =========================================================
// 集成测试工具: 进程内假后端 + reqwest 客户端
// =========================================================

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rbac_console::{
    ApiClient, ClientConfig, HttpClient, HttpMethod, HttpRequest, HttpResponse, MemoryTokenStore,
    TokenStore, TransportError,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret";
pub const VALID_TOKEN: &str = "valid-token";

// =========================================================
// reqwest 实现的 HttpClient
// =========================================================

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);
        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Error: {}", e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse::new(status, body))
    }
}

// =========================================================
// 假后端
// =========================================================

#[derive(Default)]
struct Backend {
    roles: Vec<Value>,
    users: Vec<Value>,
    next_id: u32,
}

type Shared = Arc<Mutex<Backend>>;

fn message(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "message": msg }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false)
}

fn admin_user(backend: &Backend) -> Value {
    let role = backend
        .roles
        .iter()
        .find(|r| r["name"] == "admin")
        .cloned()
        .unwrap_or(json!("admin"));
    json!({
        "_id": "u-admin",
        "name": "Root",
        "email": ADMIN_EMAIL,
        "gender": "other",
        "age": 40,
        "role": role,
    })
}

async fn login(State(db): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
        return message(StatusCode::BAD_REQUEST, "Invalid credentials");
    }
    let db = db.lock().unwrap();
    Json(json!({ "token": VALID_TOKEN, "user": admin_user(&db) })).into_response()
}

async fn profile(State(db): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    let db = db.lock().unwrap();
    Json(json!({ "user": admin_user(&db) })).into_response()
}

async fn list_roles(State(db): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    Json(Value::Array(db.lock().unwrap().roles.clone())).into_response()
}

async fn create_role(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    let mut db = db.lock().unwrap();
    if db.roles.iter().any(|r| r["name"] == body["name"]) {
        return message(StatusCode::CONFLICT, "Role already exists");
    }
    db.next_id += 1;
    let role = json!({
        "_id": format!("r{}", db.next_id),
        "name": body["name"],
        "permissions": body["permissions"],
    });
    db.roles.push(role.clone());
    (StatusCode::CREATED, Json(role)).into_response()
}

async fn delete_role(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    let mut db = db.lock().unwrap();
    let before = db.roles.len();
    db.roles.retain(|r| r["_id"] != id.as_str());
    if db.roles.len() == before {
        return message(StatusCode::NOT_FOUND, "Role not found");
    }
    Json(json!({ "message": "Role deleted" })).into_response()
}

async fn list_users(State(db): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    Json(Value::Array(db.lock().unwrap().users.clone())).into_response()
}

async fn assign_role(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Token is not valid");
    }
    let mut db = db.lock().unwrap();
    let Some(role_name) = db
        .roles
        .iter()
        .find(|r| r["_id"] == body["roleId"])
        .map(|r| r["name"].clone())
    else {
        return message(StatusCode::NOT_FOUND, "Role not found");
    };
    let Some(user) = db.users.iter_mut().find(|u| u["_id"] == body["userId"]) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    // 后端只回传角色名
    user["role"] = role_name;
    Json(json!({ "user": user.clone() })).into_response()
}

/// 启动假后端，返回 API 根地址（含 `/api`）
pub async fn spawn_backend(roles: Vec<Value>, users: Vec<Value>) -> String {
    let next_id = roles.len() as u32;
    let db: Shared = Arc::new(Mutex::new(Backend {
        roles,
        users,
        next_id,
    }));

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/profile", get(profile))
        .route("/api/roles", get(list_roles).post(create_role))
        .route("/api/roles/:id", delete(delete_role))
        .route("/api/users", get(list_users))
        .route("/api/users/assign-role", post(assign_role))
        .with_state(db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    format!("http://{}/api", addr)
}

/// 指向假后端的客户端
pub fn client(base_url: &str, token: Option<&str>) -> (ApiClient<ReqwestHttpClient>, Rc<MemoryTokenStore>) {
    let tokens = Rc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let store: Rc<dyn TokenStore> = tokens.clone();
    let api = ApiClient::new(ReqwestHttpClient::new(), ClientConfig::new(base_url), store);
    (api, tokens)
}
