use crate::{Permission, Role, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeSet;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the API base URL. Requests whose method carries a body
/// are serialized as the JSON body; fields that only belong in the path are
/// skipped during serialization.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const AUTH: bool = true;

    /// The URL path (or suffix).
    fn path(&self) -> String;
}

// =========================================================
// Response Payloads
// =========================================================

/// `{token, user}` returned by login and signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// `{user}` returned by the profile check. A missing user counts as a failed check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// `{user}` returned by role assignment; `user.role` is usually the bare role name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRoleResponse {
    pub user: User,
}

/// Whatever the backend sends back on delete; an empty body is accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// Request Definitions
// =========================================================

/// Log in with email and password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = false;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

/// Create an account; the new account is logged in immediately
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub age: u32,
}

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = false;

    fn path(&self) -> String {
        "/auth/signup".to_string()
    }
}

/// Validate the stored token and fetch the current user
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = ProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/auth/profile".to_string()
    }
}

/// Update the current user's own profile.
/// The response is a loose object of updated fields, merged client side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: u32,
}

impl ApiRequest for ProfileUpdate {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/users/profile".to_string()
    }
}

/// List all roles
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRolesRequest;

impl ApiRequest for ListRolesRequest {
    type Response = Vec<Role>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/roles".to_string()
    }
}

/// Fetch one role by id
#[derive(Debug, Serialize, Deserialize)]
pub struct GetRoleRequest {
    pub id: String,
}

impl ApiRequest for GetRoleRequest {
    type Response = Role;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/roles/{}", self.id)
    }
}

/// Body shared by role create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    pub permissions: BTreeSet<Permission>,
}

impl From<&Role> for RoleDraft {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            permissions: role.permissions.clone(),
        }
    }
}

impl ApiRequest for RoleDraft {
    type Response = Role;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/roles".to_string()
    }
}

/// Replace a role's name and permissions
#[derive(Debug, Serialize)]
pub struct UpdateRoleRequest {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(flatten)]
    pub draft: RoleDraft,
}

impl ApiRequest for UpdateRoleRequest {
    type Response = Role;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/roles/{}", self.id)
    }
}

/// Delete a role by id
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRoleRequest {
    pub id: String,
}

impl ApiRequest for DeleteRoleRequest {
    type Response = Option<Confirmation>;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/roles/{}", self.id)
    }
}

/// List all users
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users".to_string()
    }
}

/// Assign a role to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role_id: String,
}

impl ApiRequest for AssignRoleRequest {
    type Response = AssignRoleResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/users/assign-role".to_string()
    }
}
