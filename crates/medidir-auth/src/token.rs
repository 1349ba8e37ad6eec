//! Random tokens for sessions and email/phone verification.

use uuid::Uuid;

/// A 32-character hex token from a random (v4) UUID.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
