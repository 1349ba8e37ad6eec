//! # medidir-auth
//!
//! Credential primitives used by the authentication service.
//!
//! ## Modules
//!
//! - `jwt`: HS256 bearer token creation and validation
//! - `password`: Argon2id password hashing and length policy
//! - `token`: random single-use verification tokens

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
