//! Authentication

mod errors;
mod models;
pub mod password;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use password::{PasswordError, PlainPassword, hash_password, verify_password};
pub(crate) use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
