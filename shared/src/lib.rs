use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 管理员角色的固定名称（大小写敏感）
pub const ADMIN_ROLE_NAME: &str = "admin";

/// 前端内置的权限目录，后端不提供发现接口
pub const PERMISSION_CATALOG: [&str; 7] = [
    "manage_users",
    "manage_roles",
    "view_dashboard",
    "edit_content",
    "create_content",
    "delete_content",
    "publish_content",
];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 权限名称
///
/// 不透明字符串。后端返回目录之外的值时原样保留。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否属于前端权限目录
    pub fn is_known(&self) -> bool {
        PERMISSION_CATALOG.contains(&self.0.as_str())
    }

    /// 目录中的全部权限
    pub fn catalog() -> impl Iterator<Item = Permission> {
        PERMISSION_CATALOG.iter().map(|p| Permission::new(*p))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RoleWire")]
pub struct Role {
    /// 合成的角色记录（如 `{name}`）没有 id
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl Role {
    /// 只有名称的角色记录，用于后端响应中找不到匹配角色时
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            permissions: BTreeSet::new(),
        }
    }
}

/// 用户的角色字段
///
/// 后端有时返回角色名字符串，有时返回嵌入的角色对象。
/// 所有读取方都必须经过 [`RoleRef::name`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Name(String),
    Record(Role),
}

impl RoleRef {
    /// 解析后的角色名
    pub fn name(&self) -> &str {
        match self {
            RoleRef::Name(name) => name,
            RoleRef::Record(role) => &role.name,
        }
    }

    /// 嵌入角色对象的 id（字符串形式时为 None）
    pub fn record_id(&self) -> Option<&str> {
        match self {
            RoleRef::Record(role) if !role.id.is_empty() => Some(&role.id),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Role> {
        match self {
            RoleRef::Record(role) => Some(role),
            RoleRef::Name(_) => None,
        }
    }
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        RoleRef::Record(role)
    }
}

/// 解析角色名。未设置角色时返回 None。
pub fn resolve_role_name(role: Option<&RoleRef>) -> Option<&str> {
    role.map(RoleRef::name)
}

/// **管理员判定的唯一实现**
pub fn is_admin_role(role: Option<&RoleRef>) -> bool {
    resolve_role_name(role) == Some(ADMIN_ROLE_NAME)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "UserWire")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleRef>,
}

impl User {
    pub fn role_name(&self) -> Option<&str> {
        resolve_role_name(self.role.as_ref())
    }

    pub fn is_admin(&self) -> bool {
        is_admin_role(self.role.as_ref())
    }

    /// 浅合并：`fields` 中的键覆盖当前值，缺失的键保留原值。
    ///
    /// 合并结果无法反序列化为 `User` 时返回 None。
    pub fn merged_with(&self, fields: &serde_json::Map<String, serde_json::Value>) -> Option<User> {
        let mut base = match serde_json::to_value(self).ok()? {
            serde_json::Value::Object(map) => map,
            _ => return None,
        };
        for (key, value) in fields {
            base.insert(key.clone(), value.clone());
        }
        serde_json::from_value(serde_json::Value::Object(base)).ok()
    }
}

// =========================================================
// 反序列化 (Wire Shapes)
// =========================================================

/// 记录 id：后端可能只给 `_id`、只给 `id`，或两者同时给出（虚拟字段）。
/// 同时出现时以 `_id` 为准。
fn resolve_record_id(mongo_id: Option<String>, id: Option<String>) -> String {
    mongo_id.or(id).unwrap_or_default()
}

#[derive(Deserialize)]
struct RoleWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    permissions: BTreeSet<Permission>,
}

impl From<RoleWire> for Role {
    fn from(w: RoleWire) -> Self {
        Self {
            id: resolve_record_id(w.mongo_id, w.id),
            name: w.name,
            permissions: w.permissions,
        }
    }
}

#[derive(Deserialize)]
struct UserWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    role: Option<RoleRef>,
}

impl From<UserWire> for User {
    fn from(w: UserWire) -> Self {
        Self {
            id: resolve_record_id(w.mongo_id, w.id),
            name: w.name,
            email: w.email,
            gender: w.gender,
            age: w.age,
            role: w.role,
        }
    }
}
