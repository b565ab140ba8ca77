//! 仪表盘：展示当前用户的角色与权限

use super::Collection;
use crate::api::ApiClient;
use crate::observable::Observable;
use crate::request::HttpClient;
use rbac_console_shared::{Permission, Role, RoleRef, User};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    /// 用于按角色名查权限；拉取失败只记日志
    pub roles: Collection<Role>,
}

impl DashboardState {
    /// 用户的权限：角色记录自带的权限优先，否则按角色名在已加载的角色里查
    pub fn permissions_for(&self, user: &User) -> BTreeSet<Permission> {
        match user.role.as_ref() {
            Some(RoleRef::Record(role)) if !role.permissions.is_empty() => role.permissions.clone(),
            // 空权限的嵌入记录多半是未填充 permissions 的投影，仍按角色名查一次
            Some(role) => self
                .roles
                .items()
                .iter()
                .find(|r| r.name == role.name())
                .map(|r| r.permissions.clone())
                .unwrap_or_default(),
            None => BTreeSet::new(),
        }
    }
}

pub fn role_label(user: &User) -> &str {
    user.role_name().unwrap_or("Unknown")
}

pub struct DashboardController<C> {
    api: ApiClient<C>,
    state: Observable<DashboardState>,
}

impl<C> Clone for DashboardController<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: HttpClient> DashboardController<C> {
    pub fn new(api: ApiClient<C>) -> Self {
        Self {
            api,
            state: Observable::new(DashboardState::default()),
        }
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&DashboardState) + 'static) {
        self.state.subscribe(listener);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }

    pub async fn load(&self) {
        self.state.update(|s| s.roles.begin_load());
        let result = self.api.list_roles().await;
        if let Err(e) = &result {
            log::warn!("[Dashboard] Failed to load roles: {}", e);
        }
        self.state.update(|s| s.roles.finish_load(result));
    }
}
