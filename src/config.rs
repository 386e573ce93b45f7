//! Server configuration
//!
//! Every setting can come from a flag or an environment variable (a `.env`
//! file is loaded first by `load_env`).

use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

/// Development signing secret, used when `JWT_SECRET` is unset
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

/// Shortest secret accepted without a warning (HS256 key size)
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Parser, Clone)]
#[command(name = "authgate")]
#[command(about = "Issues time-limited JWTs for seeded credentials and guards a calculator endpoint")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "AUTHGATE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// HMAC secret used to sign and verify tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_default_value = true, hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in minutes
    #[arg(long, env = "TOKEN_TTL_MINUTES", default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_MINUTES))]
    pub token_ttl_minutes: i64,

    /// bcrypt work factor for password verifiers
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Login name of the seed identity
    #[arg(long, env = "SEED_USERNAME", default_value = "vinod")]
    pub seed_username: String,

    /// Token subject for the seed identity (defaults to the login name)
    #[arg(long, env = "SEED_SUBJECT")]
    pub seed_subject: Option<String>,

    /// Password of the seed identity
    #[arg(long, env = "SEED_PASSWORD", default_value = "password123", hide_default_value = true, hide_env_values = true)]
    pub seed_password: String,

    /// Default tracing filter when RUST_LOG is unset
    #[arg(long, env = "AUTHGATE_LOG", default_value = "authgate=debug,tower_http=debug")]
    pub log_filter: String,
}

impl Config {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn secret_too_short(&self) -> bool {
        self.jwt_secret.len() < MIN_SECRET_LEN
    }

    pub fn seed_subject(&self) -> &str {
        self.seed_subject.as_deref().unwrap_or(&self.seed_username)
    }
}

/// Load `.env` from the working directory (and parents), then the crate root
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
