//! Registration, login, bearer-token sessions, and verification tokens.

pub mod service;

pub use service::{AuthService, LoginResult, RegisterUser};
