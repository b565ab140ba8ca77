//! 个人资料页面控制器

use super::{Notice, any_blank, parse_age};
use crate::error::{FormError, ValidationError};
use crate::observable::Observable;
use crate::request::HttpClient;
use crate::session::SessionStore;
use rbac_console_shared::User;
use rbac_console_shared::protocol::ProfileUpdate;

/// 表单输入的原始文本
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            gender: user.gender.clone().unwrap_or_default(),
            age: user.age.map(|a| a.to_string()).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        if any_blank(&[&self.name, &self.email, &self.gender, &self.age]) {
            return Err(ValidationError::IncompleteForm);
        }
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            gender: self.gender.trim().to_string(),
            age: parse_age(&self.age)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub form: ProfileForm,
    pub error: Option<String>,
    pub saving: bool,
    /// 最近一次提交成功，显示横幅
    pub saved: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Gender,
    Age,
}

pub struct ProfileController<C> {
    session: SessionStore<C>,
    state: Observable<ProfileState>,
}

impl<C> Clone for ProfileController<C> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: HttpClient> ProfileController<C> {
    /// 表单初始值取自会话中的当前用户
    pub fn new(session: SessionStore<C>) -> Self {
        let form = session
            .current_user()
            .map(|u| ProfileForm::from_user(&u))
            .unwrap_or_default();
        Self {
            session,
            state: Observable::new(ProfileState {
                form,
                ..ProfileState::default()
            }),
        }
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&ProfileState) + 'static) {
        self.state.subscribe(listener);
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }

    pub fn reset_from(&self, user: &User) {
        self.state.update(|s| s.form = ProfileForm::from_user(user));
    }

    pub fn set_field(&self, field: ProfileField, value: &str) {
        self.state.update(|s| {
            let slot = match field {
                ProfileField::Name => &mut s.form.name,
                ProfileField::Email => &mut s.form.email,
                ProfileField::Gender => &mut s.form.gender,
                ProfileField::Age => &mut s.form.age,
            };
            *slot = value.to_string();
            s.saved = false;
        });
    }

    pub async fn submit(&self) -> Result<(), FormError> {
        self.state.update(|s| {
            s.error = None;
            s.saved = false;
        });

        let update = match self.state.with(|s| s.form.validate()) {
            Ok(update) => update,
            Err(e) => {
                self.state.update(|s| s.error = Some(e.to_string()));
                return Err(e.into());
            }
        };

        self.state.update(|s| s.saving = true);
        let result = self.session.update_profile(&update).await;

        match result {
            Ok(()) => {
                let form = self
                    .session
                    .current_user()
                    .map(|u| ProfileForm::from_user(&u));
                self.state.update(|s| {
                    if let Some(form) = form {
                        s.form = form;
                    }
                    s.saving = false;
                    s.saved = true;
                    s.notice = Some(Notice::success("Profile updated successfully!"));
                });
                Ok(())
            }
            Err(e) => {
                self.session.expire(&e);
                self.state.update(|s| {
                    s.saving = false;
                    s.error = Some(e.message.clone());
                });
                Err(e.into())
            }
        }
    }

    pub fn dismiss_notice(&self) {
        self.state.update(|s| s.notice = None);
    }
}
