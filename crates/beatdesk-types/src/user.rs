//! Platform user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Identified;

/// Role of a platform account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular listener.
    #[default]
    Listener,
    /// Verified artist account.
    Artist,
    /// Content moderator.
    Moderator,
    /// Backoffice administrator.
    Admin,
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account in good standing.
    #[default]
    Active,
    /// Blocked by an administrator.
    Blocked,
    /// Waiting for e-mail verification.
    Pending,
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country: Option<String>,
    /// Reason recorded with the block.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Registration time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last successful login.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true if the account is blocked.
    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Blocked
    }

    /// Marks the account as blocked.
    pub fn block(&mut self, reason: Option<String>) {
        self.status = UserStatus::Blocked;
        self.block_reason = reason;
    }

    /// Lifts a block.
    pub fn unblock(&mut self) {
        if self.status == UserStatus::Blocked {
            self.status = UserStatus::Active;
        }
        self.block_reason = None;
    }

    /// Applies the non-empty fields of an update.
    pub fn apply_update(&mut self, update: &UpdateUserRequest) {
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(name) = &update.display_name {
            self.display_name = Some(name.clone());
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(country) = &update.country {
            self.country = Some(country.clone());
        }
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Request to create a new account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Desired login name.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Request to update an existing account. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// New country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}
