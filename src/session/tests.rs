use super::*;
use crate::api::{LOGIN_FAILED, REGISTER_FAILED, UPDATE_PROFILE_FAILED};
use crate::error::ApiErrorKind;
use crate::request::HttpMethod;
use crate::storage::TokenStore;
use crate::testing::{MockHttpClient, mock_api};
use serde_json::json;
use std::cell::RefCell;

// =========================================================
// 辅助函数
// =========================================================

fn store(token: Option<&str>) -> (SessionStore<MockHttpClient>, Rc<crate::storage::MemoryTokenStore>) {
    let (api, tokens) = mock_api(token);
    (SessionStore::new(api), tokens)
}

fn user_json(role: serde_json::Value) -> serde_json::Value {
    json!({ "_id": "u1", "name": "Ann", "email": "ann@example.com", "gender": "female", "age": 30, "role": role })
}

fn auth_body(token: &str, role: serde_json::Value) -> serde_json::Value {
    json!({ "token": token, "user": user_json(role) })
}

async fn logged_in(role: serde_json::Value) -> (SessionStore<MockHttpClient>, Rc<crate::storage::MemoryTokenStore>) {
    let (session, tokens) = store(None);
    session
        .api()
        .http()
        .mock_response(HttpMethod::Post, "/auth/login", 200, auth_body("tok", role));
    session.login("ann@example.com", "pw").await.unwrap();
    (session, tokens)
}

// =========================================================
// 启动校验
// =========================================================

#[tokio::test]
async fn test_init_without_token_skips_network() {
    let (session, _) = store(None);
    session.init().await;

    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert!(!session.snapshot().loading());
    assert_eq!(session.api().http().request_count(), 0);
}

#[tokio::test]
async fn test_init_with_valid_token_authenticates() {
    let (session, tokens) = store(Some("stored"));
    session.api().http().mock_response(
        HttpMethod::Get,
        "/auth/profile",
        200,
        json!({ "user": user_json(json!({ "_id": "r1", "name": "admin", "permissions": [] })) }),
    );

    session.init().await;

    let s = session.snapshot();
    assert!(s.is_authenticated());
    assert!(s.is_admin());
    assert_eq!(s.token(), Some("stored"));
    assert_eq!(tokens.get().as_deref(), Some("stored"));
    assert_eq!(
        session.api().http().last_request().unwrap().header("Authorization"),
        Some("Bearer stored")
    );
}

#[tokio::test]
async fn test_init_passes_through_loading() {
    let (session, _) = store(Some("stored"));
    let release = session.api().http().mock_deferred(HttpMethod::Get, "/auth/profile");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |s| sink.borrow_mut().push(s.status()));

    let init = session.init();
    let respond = async {
        let _ = release.send(crate::request::HttpResponse::new(
            200,
            json!({ "user": user_json(json!("editor")) }).to_string(),
        ));
    };
    futures::join!(init, respond);

    assert_eq!(
        *seen.borrow(),
        vec![
            AuthStatus::Unauthenticated,
            AuthStatus::Loading,
            AuthStatus::Authenticated { admin: false },
        ]
    );
}

#[tokio::test]
async fn test_init_enters_loading_before_first_poll() {
    let (session, _) = store(Some("stored"));
    session.api().http().mock_response(
        HttpMethod::Get,
        "/auth/profile",
        200,
        json!({ "user": user_json(json!("editor")) }),
    );

    let pending = session.init();
    assert_eq!(session.status(), AuthStatus::Loading);
    assert_eq!(session.api().http().request_count(), 0);

    pending.await;
    assert_eq!(session.status(), AuthStatus::Authenticated { admin: false });
}

#[tokio::test]
async fn test_init_with_rejected_token_clears_it() {
    let (session, tokens) = store(Some("expired"));
    session.api().http().mock_response(
        HttpMethod::Get,
        "/auth/profile",
        401,
        json!({ "message": "Token is not valid" }),
    );

    session.init().await;

    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(session.snapshot(), Session::default());
    assert_eq!(tokens.get(), None);
}

#[tokio::test]
async fn test_init_without_user_payload_clears_token() {
    let (session, tokens) = store(Some("stored"));
    session
        .api()
        .http()
        .mock_response(HttpMethod::Get, "/auth/profile", 200, json!({}));

    session.init().await;

    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(tokens.get(), None);
}

#[tokio::test]
async fn test_init_transport_failure_is_soft() {
    let (session, tokens) = store(Some("stored"));
    session
        .api()
        .http()
        .mock_transport_error(HttpMethod::Get, "/auth/profile");

    session.init().await;

    assert!(!session.snapshot().is_authenticated());
    assert_eq!(tokens.get(), None);
}

// =========================================================
// 登录 / 注册
// =========================================================

#[tokio::test]
async fn test_login_persists_token_and_derives_admin() {
    let (session, tokens) = logged_in(json!("admin")).await;

    let s = session.snapshot();
    assert!(s.is_authenticated());
    assert!(s.is_admin());
    assert_eq!(s.current_user().map(|u| u.name.as_str()), Some("Ann"));
    assert_eq!(tokens.get().as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_admin_flag_is_case_sensitive() {
    let (session, _) = logged_in(json!({ "_id": "r1", "name": "Admin" })).await;
    assert!(session.snapshot().is_authenticated());
    assert!(!session.snapshot().is_admin());
}

#[tokio::test]
async fn test_login_failure_leaves_session_unchanged() {
    let (session, tokens) = store(None);
    session.api().http().mock_response(
        HttpMethod::Post,
        "/auth/login",
        400,
        json!({ "message": "Invalid credentials" }),
    );
    let before = session.snapshot();

    let err = session.login("ann@example.com", "nope").await.unwrap_err();

    assert_eq!(err.message(), "Invalid credentials");
    assert_eq!(session.snapshot(), before);
    assert_eq!(tokens.get(), None);
}

#[tokio::test]
async fn test_login_failure_without_message_uses_fallback() {
    let (session, _) = store(None);
    session
        .api()
        .http()
        .mock_transport_error(HttpMethod::Post, "/auth/login");

    let err = session.login("ann@example.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), LOGIN_FAILED);
}

#[tokio::test]
async fn test_register_logs_in_new_account() {
    let (session, tokens) = store(None);
    session.api().http().mock_response(
        HttpMethod::Post,
        "/auth/signup",
        201,
        auth_body("new-tok", json!("user")),
    );

    let signup = SignupRequest {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        password: "secret".into(),
        gender: "female".into(),
        age: 30,
    };
    session.register(&signup).await.unwrap();

    assert_eq!(session.status(), AuthStatus::Authenticated { admin: false });
    assert_eq!(tokens.get().as_deref(), Some("new-tok"));
}

#[tokio::test]
async fn test_register_failure_uses_fallback() {
    let (session, tokens) = store(None);
    session
        .api()
        .http()
        .mock_raw(HttpMethod::Post, "/auth/signup", 500, "");

    let err = session.register(&SignupRequest::default()).await.unwrap_err();

    assert_eq!(err.message(), REGISTER_FAILED);
    assert_eq!(session.snapshot(), Session::default());
    assert_eq!(tokens.get(), None);
}

// =========================================================
// 注销 / 过期
// =========================================================

#[tokio::test]
async fn test_logout_clears_everything() {
    let (session, tokens) = logged_in(json!("admin")).await;
    let requests_before = session.api().http().request_count();

    session.logout();

    let s = session.snapshot();
    assert_eq!(s.token(), None);
    assert_eq!(s.current_user(), None);
    assert!(!s.is_authenticated());
    assert!(!s.is_admin());
    assert_eq!(tokens.get(), None);
    assert_eq!(session.api().http().request_count(), requests_before);
}

#[tokio::test]
async fn test_logout_from_empty_session_is_harmless() {
    let (session, _) = store(None);
    session.logout();
    assert_eq!(session.snapshot(), Session::default());
}

#[tokio::test]
async fn test_expire_only_on_401() {
    let (session, tokens) = logged_in(json!("user")).await;

    assert!(!session.expire(&ApiError::status(403, "Forbidden")));
    assert!(session.snapshot().is_authenticated());

    assert!(session.expire(&ApiError::status(401, "Token expired")));
    assert!(!session.snapshot().is_authenticated());
    assert_eq!(tokens.get(), None);
}

// =========================================================
// 个人资料
// =========================================================

#[tokio::test]
async fn test_update_profile_merges_fields() {
    let (session, _) = logged_in(json!("editor")).await;
    session.api().http().mock_response(
        HttpMethod::Put,
        "/users/profile",
        200,
        json!({ "name": "Annie", "age": 31 }),
    );

    let update = ProfileUpdate {
        name: "Annie".into(),
        email: "ann@example.com".into(),
        gender: "female".into(),
        age: 31,
    };
    session.update_profile(&update).await.unwrap();

    let s = session.snapshot();
    let user = s.current_user().unwrap();
    assert_eq!(user.name, "Annie");
    assert_eq!(user.age, Some(31));
    assert_eq!(user.gender.as_deref(), Some("female"));
    assert_eq!(user.role_name(), Some("editor"));
    assert!(s.is_authenticated());
}

#[tokio::test]
async fn test_update_profile_failure_keeps_user() {
    let (session, _) = logged_in(json!("editor")).await;
    session.api().http().mock_response(
        HttpMethod::Put,
        "/users/profile",
        400,
        json!({ "message": "Email already in use" }),
    );
    let before = session.snapshot();

    let err = session
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Email already in use");
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn test_update_profile_keeps_admin_flag() {
    let (session, _) = logged_in(json!({ "_id": "r1", "name": "admin", "permissions": [] })).await;
    // 未填充的角色引用：只有 ObjectId 字符串
    session.api().http().mock_response(
        HttpMethod::Put,
        "/users/profile",
        200,
        json!({ "_id": "u1", "name": "Annie", "role": "64f0c0ffee" }),
    );

    session.update_profile(&ProfileUpdate::default()).await.unwrap();

    let s = session.snapshot();
    assert_eq!(s.current_user().unwrap().name, "Annie");
    assert!(s.is_admin());
    assert_eq!(session.status(), AuthStatus::Authenticated { admin: true });
}

#[tokio::test]
async fn test_update_profile_accepts_virtual_id() {
    let (session, _) = logged_in(json!("editor")).await;
    session.api().http().mock_response(
        HttpMethod::Put,
        "/users/profile",
        200,
        json!({ "_id": "u1", "id": "u1", "name": "Annie", "age": 31 }),
    );

    session.update_profile(&ProfileUpdate::default()).await.unwrap();

    let user = session.current_user().unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Annie");
    assert_eq!(user.age, Some(31));
}

#[tokio::test]
async fn test_update_profile_unmergeable_payload_is_an_error() {
    let (session, _) = logged_in(json!("editor")).await;
    session.api().http().mock_response(
        HttpMethod::Put,
        "/users/profile",
        200,
        json!({ "name": "Annie", "age": "thirty" }),
    );
    let before = session.snapshot();

    let err = session
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Decode);
    assert_eq!(err.message(), UPDATE_PROFILE_FAILED);
    assert_eq!(session.snapshot(), before);
}
