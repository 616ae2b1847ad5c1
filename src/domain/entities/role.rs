use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A (role, page_name, can_access) record. `page_name` is a free string so
/// records written for pages this console does not know still round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    pub id: i64,
    pub role_id: i64,
    pub page_name: String,
    pub can_access: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Body for creating or updating a page permission on a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionGrant {
    pub page_name: String,
    #[serde(default = "default_true")]
    pub can_access: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
}

fn default_true() -> bool {
    true
}

impl Role {
    /// Exact, case-sensitive lookup of the record for `page_name`.
    pub fn permission_for(&self, page_name: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.page_name == page_name)
    }

    /// True iff some record for `page_name` grants access.
    pub fn grants(&self, page_name: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.page_name == page_name && p.can_access)
    }
}

impl CreateRoleRequest {
    pub fn validate(&self) -> crate::domain::errors::DomainResult<()> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 50 {
            return Err(crate::domain::errors::DomainError::ValidationError(
                "Role name must be between 1 and 50 characters".to_string(),
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 255 {
                return Err(crate::domain::errors::DomainError::ValidationError(
                    "Role description must be at most 255 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}
