//! 用户管理页面控制器
//!
//! 挂载时并发拉取用户和角色，两个结果各自到达即各自生效。

use super::{AuthFailureHook, Collection, Notice, SyncStrategy};
use crate::api::ApiClient;
use crate::error::{ApiResult, FormError, ValidationError};
use crate::observable::Observable;
use crate::request::HttpClient;
use rbac_console_shared::{Role, RoleRef, User};

/// 分配角色对话框
#[derive(Debug, Clone, PartialEq)]
pub struct AssignDialog {
    pub user: User,
    /// 下拉框当前选中的角色 id，空串表示未选
    pub selected_role_id: String,
    pub error: Option<String>,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsersState {
    pub users: Collection<User>,
    pub roles: Collection<Role>,
    pub assign: Option<AssignDialog>,
    pub notice: Option<Notice>,
}

impl UsersState {
    /// 用户当前角色在表格里的显示文本
    pub fn role_label(user: &User) -> &str {
        user.role_name().unwrap_or("None")
    }

    /// 用户当前角色对应的 id：角色记录直接取 id，角色名则在已加载的角色里按名字查
    fn current_role_id(&self, user: &User) -> String {
        match user.role.as_ref() {
            Some(RoleRef::Record(role)) if !role.id.is_empty() => role.id.clone(),
            Some(role) => self
                .roles
                .items()
                .iter()
                .find(|r| r.name == role.name())
                .map(|r| r.id.clone())
                .unwrap_or_default(),
            None => String::new(),
        }
    }
}

pub struct UsersController<C> {
    api: ApiClient<C>,
    state: Observable<UsersState>,
    on_auth_failure: AuthFailureHook,
}

impl<C> Clone for UsersController<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            on_auth_failure: self.on_auth_failure.clone(),
        }
    }
}

impl<C: HttpClient> UsersController<C> {
    /// 分配角色后只替换该用户的 role
    pub const ASSIGN_SYNC: SyncStrategy = SyncStrategy::Patch;

    pub fn new(api: ApiClient<C>) -> Self {
        Self {
            api,
            state: Observable::new(UsersState::default()),
            on_auth_failure: AuthFailureHook::default(),
        }
    }

    pub fn on_unauthorized(mut self, hook: AuthFailureHook) -> Self {
        self.on_auth_failure = hook;
        self
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub fn snapshot(&self) -> UsersState {
        self.state.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&UsersState) + 'static) {
        self.state.subscribe(listener);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }

    fn observe<T>(&self, result: &ApiResult<T>) {
        if let Err(e) = result {
            self.on_auth_failure.notify(e);
        }
    }

    /// 并发拉取用户与角色
    pub async fn load(&self) {
        self.state.update(|s| {
            s.users.begin_load();
            s.roles.begin_load();
        });

        let users = async {
            let result = self.api.list_users().await;
            self.observe(&result);
            self.state.update(|s| s.users.finish_load(result));
        };
        let roles = async {
            let result = self.api.list_roles().await;
            self.observe(&result);
            self.state.update(|s| s.roles.finish_load(result));
        };
        futures::join!(users, roles);
    }

    // =========================================================
    // 分配角色
    // =========================================================

    /// 打开对话框并预选用户当前的角色
    pub fn open_assign(&self, user_id: &str) {
        self.state.update(|s| {
            let Some(user) = s.users.find(user_id).cloned() else {
                log::warn!("[Users] open_assign for unknown user {}", user_id);
                return;
            };
            let selected_role_id = s.current_role_id(&user);
            s.assign = Some(AssignDialog {
                user,
                selected_role_id,
                error: None,
                saving: false,
            });
        });
    }

    pub fn select_role(&self, role_id: &str) {
        self.state.update(|s| {
            if let Some(dialog) = s.assign.as_mut() {
                dialog.selected_role_id = role_id.to_string();
            }
        });
    }

    pub fn close_assign(&self) {
        self.state.update(|s| s.assign = None);
    }

    /// 提交分配。成功后只修补该用户，不重拉列表。
    pub async fn assign(&self) -> Result<(), FormError> {
        let Some(dialog) = self.state.with(|s| s.assign.clone()) else {
            return Ok(());
        };

        if dialog.selected_role_id.is_empty() {
            let err = ValidationError::NoRoleSelected;
            self.state.update(|s| {
                if let Some(d) = s.assign.as_mut() {
                    d.error = Some(err.to_string());
                }
            });
            return Err(err.into());
        }

        self.state.update(|s| {
            if let Some(d) = s.assign.as_mut() {
                d.error = None;
                d.saving = true;
            }
        });

        let result = self
            .api
            .assign_role(&dialog.user.id, &dialog.selected_role_id)
            .await;
        self.observe(&result);

        match result {
            Ok(resp) => {
                log::info!(
                    "[Users] Assigned role {} to {}",
                    dialog.selected_role_id,
                    dialog.user.id
                );
                Self::ASSIGN_SYNC
                    .apply(|| self.load(), || {
                        self.state.update(|s| {
                            let role = s
                                .roles
                                .find(&dialog.selected_role_id)
                                .cloned()
                                .unwrap_or_else(|| {
                                    Role::named(resp.user.role_name().unwrap_or_default())
                                });
                            s.users.patch(&dialog.user.id, |u| {
                                u.role = Some(RoleRef::Record(role))
                            });
                        })
                    })
                    .await;
                self.state.update(|s| {
                    s.assign = None;
                    s.notice = Some(Notice::success("Role assigned successfully"));
                });
                Ok(())
            }
            Err(e) => {
                self.state.update(|s| {
                    if let Some(d) = s.assign.as_mut() {
                        d.error = Some(e.message.clone());
                        d.saving = false;
                    }
                });
                Err(e.into())
            }
        }
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }
}
