//! Authentication Module
//! Mission: Issue signed, time-limited tokens for verified credentials and gate API access on them

pub mod api;
pub mod authority;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use authority::CredentialAuthority;
pub use error::AuthError;
pub use jwt::{parse_claims_unverified, JwtHandler};
pub use middleware::auth_middleware;
pub use models::{AccessToken, Claims, Identity};
pub use user_store::CredentialStore;
