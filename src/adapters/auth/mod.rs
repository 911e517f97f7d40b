//! Credential adapters.
//!
//! Implementations of the `TokenService` and `PasswordHasher` ports:
//!
//! - `jwt` - HS256 tokens signed with the configured secret
//! - `argon2_hasher` - Argon2id hashes computed on the blocking pool
//! - `mock` - Test implementations with readable tokens and hashes

mod argon2_hasher;
mod jwt;
mod mock;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::JwtTokenService;
pub use mock::{MockPasswordHasher, MockTokenService};
