use serde::{Deserialize, Serialize};

use crate::domain::entities::Role;
use crate::domain::errors::{DomainError, DomainResult};
use crate::shared::utils::email_validator::validate_and_normalize_email;

/// Identity snapshot as returned by the backend's login and user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub role_id: Option<i64>,
}

/// Partial update; `None` fields are left out of the upstream body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 100;
const PASSWORD_MIN: usize = 6;
const FULL_NAME_MAX: usize = 255;

fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(DomainError::ValidationError(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(DomainError::ValidationError(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        )));
    }
    Ok(())
}

fn validate_full_name(full_name: Option<&str>) -> DomainResult<()> {
    match full_name {
        Some(name) if name.chars().count() > FULL_NAME_MAX => Err(DomainError::ValidationError(
            format!("Full name must be at most {} characters", FULL_NAME_MAX),
        )),
        _ => Ok(()),
    }
}

impl CreateUserRequest {
    /// Validates the form and normalizes username/email in place.
    pub fn validate(&mut self) -> DomainResult<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        validate_full_name(self.full_name.as_deref())?;
        self.username = self.username.trim().to_string();
        self.email = validate_and_normalize_email(&self.email)?;
        Ok(())
    }
}

impl UpdateUserRequest {
    pub fn validate(&mut self) -> DomainResult<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
            self.username = Some(username.trim().to_string());
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        validate_full_name(self.full_name.as_deref())?;
        if let Some(email) = &self.email {
            self.email = Some(validate_and_normalize_email(email)?);
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_token_type() -> String {
    "bearer".to_string()
}
