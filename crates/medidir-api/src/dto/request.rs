//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use medidir_service::RegisterUser;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(alias = "phoneNumber")]
    #[validate(length(min = 3, max = 32, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub image: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
            password: req.password,
            image: req.image,
        }
    }
}

/// Login request body. Either `email` or `phone_number` identifies the account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// The identifier to look the account up by, email first.
    pub fn login(&self) -> Option<&str> {
        present(&self.email).or_else(|| present(&self.phone_number))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Verification token request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerificationTokenRequest {
    /// Usually the email address being confirmed.
    #[validate(length(min = 1, max = 255, message = "Identifier is required"))]
    pub identifier: String,
    /// Token lifetime; the configured default applies when omitted.
    #[validate(range(min = 1, max = 10080))]
    pub ttl_minutes: Option<i64>,
}

/// Bulk update body: rows matching `filter` receive `changes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub filter: Map<String, Value>,
    #[serde(default)]
    pub changes: Map<String, Value>,
}

/// Doctor assignment body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignDoctorRequest {
    #[validate(range(min = 1))]
    pub doctor_id: i64,
}
