//! 登录 / 注册表单

use super::{any_blank, parse_age};
use crate::error::{FormError, ValidationError};
use crate::request::HttpClient;
use crate::session::SessionStore;
use rbac_console_shared::protocol::SignupRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if any_blank(&[&self.email, &self.password]) {
            return Err(ValidationError::IncompleteForm);
        }
        Ok(())
    }

    /// 校验通过后才发请求；成功时会话进入已认证状态
    pub async fn submit<C: HttpClient>(&self, session: &SessionStore<C>) -> Result<(), FormError> {
        self.validate()?;
        session.login(self.email.trim(), &self.password).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub age: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        if any_blank(&[
            &self.name,
            &self.email,
            &self.password,
            &self.gender,
            &self.age,
        ]) {
            return Err(ValidationError::IncompleteForm);
        }
        Ok(SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            gender: self.gender.trim().to_string(),
            age: parse_age(&self.age)?,
        })
    }

    pub async fn submit<C: HttpClient>(&self, session: &SessionStore<C>) -> Result<(), FormError> {
        let signup = self.validate()?;
        session.register(&signup).await?;
        Ok(())
    }
}
