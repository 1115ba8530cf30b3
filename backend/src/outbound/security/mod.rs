//! Credential adapters: Argon2 password hashing and HS256 access tokens.

mod argon2_hasher;
mod jwt_access_tokens;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_access_tokens::{JwtAccessTokens, TokenSecretError};
