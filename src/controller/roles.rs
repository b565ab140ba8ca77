//! 角色管理页面控制器

use super::{AuthFailureHook, Collection, Notice, SyncStrategy};
use crate::api::ApiClient;
use crate::error::{ApiResult, FormError, ValidationError};
use crate::observable::Observable;
use crate::request::HttpClient;
use rbac_console_shared::protocol::RoleDraft;
use rbac_console_shared::{Permission, Role};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    /// 编辑指定 id 的角色
    Edit(String),
}

/// 创建 / 编辑角色的对话框状态
#[derive(Debug, Clone, PartialEq)]
pub struct RoleEditor {
    pub mode: EditorMode,
    pub name: String,
    pub permissions: BTreeSet<Permission>,
    /// 内联错误，下次提交时清除
    pub error: Option<String>,
    pub saving: bool,
}

impl RoleEditor {
    fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            name: String::new(),
            permissions: BTreeSet::new(),
            error: None,
            saving: false,
        }
    }

    fn edit(role: &Role) -> Self {
        Self {
            mode: EditorMode::Edit(role.id.clone()),
            name: role.name.clone(),
            permissions: role.permissions.clone(),
            error: None,
            saving: false,
        }
    }

    pub fn is_create(&self) -> bool {
        self.mode == EditorMode::Create
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    fn draft(&self) -> Result<RoleDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingRoleName);
        }
        Ok(RoleDraft {
            name: name.to_string(),
            permissions: self.permissions.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RolesState {
    pub roles: Collection<Role>,
    pub editor: Option<RoleEditor>,
    /// 等待确认删除的角色
    pub pending_delete: Option<Role>,
    pub deleting: bool,
    pub notice: Option<Notice>,
}

pub struct RolesController<C> {
    api: ApiClient<C>,
    state: Observable<RolesState>,
    on_auth_failure: AuthFailureHook,
}

impl<C> Clone for RolesController<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            on_auth_failure: self.on_auth_failure.clone(),
        }
    }
}

impl<C: HttpClient> RolesController<C> {
    /// 创建 / 更新后整体重拉
    pub const SAVE_SYNC: SyncStrategy = SyncStrategy::Refetch;
    /// 删除后按 id 从本地列表移除
    pub const DELETE_SYNC: SyncStrategy = SyncStrategy::Patch;

    pub fn new(api: ApiClient<C>) -> Self {
        Self {
            api,
            state: Observable::new(RolesState::default()),
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

    pub fn snapshot(&self) -> RolesState {
        self.state.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&RolesState) + 'static) {
        self.state.subscribe(listener);
    }

    /// 视图卸载后调用，迟到的响应将被丢弃
    pub fn dispose(&self) {
        self.state.dispose();
    }

    pub async fn load(&self) {
        self.state.update(|s| s.roles.begin_load());
        let result = self.api.list_roles().await;
        self.observe(&result);
        self.state.update(|s| s.roles.finish_load(result));
    }

    fn observe<T>(&self, result: &ApiResult<T>) {
        if let Err(e) = result {
            self.on_auth_failure.notify(e);
        }
    }

    // =========================================================
    // 编辑对话框
    // =========================================================

    pub fn open_create(&self) {
        self.state.update(|s| s.editor = Some(RoleEditor::create()));
    }

    pub fn open_edit(&self, role: &Role) {
        self.state.update(|s| s.editor = Some(RoleEditor::edit(role)));
    }

    pub fn close_editor(&self) {
        self.state.update(|s| s.editor = None);
    }

    pub fn set_name(&self, name: &str) {
        self.state.update(|s| {
            if let Some(editor) = s.editor.as_mut() {
                editor.name = name.to_string();
            }
        });
    }

    pub fn toggle_permission(&self, permission: &Permission) {
        self.state.update(|s| {
            if let Some(editor) = s.editor.as_mut() {
                if !editor.permissions.remove(permission) {
                    editor.permissions.insert(permission.clone());
                }
            }
        });
    }

    /// 提交对话框：创建或更新角色，成功后重拉列表并关闭对话框
    ///
    /// 没有打开的对话框时什么也不做。
    pub async fn submit(&self) -> Result<(), FormError> {
        let Some(editor) = self.state.with(|s| s.editor.clone()) else {
            return Ok(());
        };

        let draft = match editor.draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.state.update(|s| {
                    if let Some(editor) = s.editor.as_mut() {
                        editor.error = Some(e.to_string());
                    }
                });
                return Err(e.into());
            }
        };

        self.state.update(|s| {
            if let Some(editor) = s.editor.as_mut() {
                editor.error = None;
                editor.saving = true;
            }
        });

        let (result, done) = match &editor.mode {
            EditorMode::Create => (
                self.api.create_role(&draft).await,
                "Role created successfully",
            ),
            EditorMode::Edit(id) => (
                self.api.update_role(id, &draft).await,
                "Role updated successfully",
            ),
        };
        self.observe(&result);

        match result {
            Ok(role) => {
                log::info!("[Roles] Saved role {} ({})", role.name, role.id);
                Self::SAVE_SYNC
                    .apply(|| self.load(), || {
                        self.state.update(|s| {
                            if !s.roles.patch(&role.id, |r| *r = role.clone()) {
                                s.roles.finish_load(Ok(append(s.roles.items(), role.clone())));
                            }
                        })
                    })
                    .await;
                self.state.update(|s| {
                    s.editor = None;
                    s.notice = Some(Notice::success(done));
                });
                Ok(())
            }
            Err(e) => {
                self.state.update(|s| {
                    if let Some(editor) = s.editor.as_mut() {
                        editor.error = Some(e.message.clone());
                        editor.saving = false;
                    }
                });
                Err(e.into())
            }
        }
    }

    // =========================================================
    // 删除
    // =========================================================

    pub fn request_delete(&self, role: &Role) {
        self.state.update(|s| s.pending_delete = Some(role.clone()));
    }

    pub fn cancel_delete(&self) {
        self.state.update(|s| {
            s.pending_delete = None;
            s.deleting = false;
        });
    }

    /// 删除待确认的角色。成功后只从本地列表移除该条，不再发请求。
    pub async fn confirm_delete(&self) -> ApiResult<()> {
        let Some(role) = self.state.with(|s| s.pending_delete.clone()) else {
            return Ok(());
        };

        self.state.update(|s| s.deleting = true);
        let result = self.api.delete_role(&role.id).await;
        self.observe(&result);

        match result {
            Ok(_) => {
                Self::DELETE_SYNC
                    .apply(|| self.load(), || {
                        self.state.update(|s| {
                            s.roles.remove(&role.id);
                        })
                    })
                    .await;
                self.state.update(|s| {
                    s.pending_delete = None;
                    s.deleting = false;
                    s.notice = Some(Notice::success("Role deleted successfully"));
                });
                Ok(())
            }
            Err(e) => {
                self.state.update(|s| {
                    s.deleting = false;
                    s.notice = Some(Notice::error(e.message.clone()));
                });
                Err(e)
            }
        }
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }
}

fn append(items: &[Role], role: Role) -> Vec<Role> {
    let mut items = items.to_vec();
    items.push(role);
    items
}
