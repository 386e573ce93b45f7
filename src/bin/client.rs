//! authgate client
//!
//! Command-line counterpart of the server: logs in, keeps the token between
//! runs, shows what a token claims (without verifying it) and calls the
//! protected calculator.
//!
//! Usage:
//!   authgate-client login --username vinod --password password123
//!   authgate-client inspect
//!   authgate-client calculate -a 5 -b 10
//!   authgate-client logout
//!
//! Environment Variables:
//!   AUTHGATE_URL - Server base URL (default: http://127.0.0.1:8000)
//!   AUTHGATE_TOKEN - Token to use instead of the saved one
//!   AUTHGATE_TOKEN_FILE - Where the token is saved (default: ~/.config/authgate/token)

use anyhow::{bail, Context, Result};
use authgate::{
    api::Calculation,
    auth::models::{ErrorBody, LoginResponse},
    client::{describe_token, resolve_token, TokenStore},
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "authgate-client")]
#[command(about = "Log in to an authgate server and call its protected calculator")]
struct Args {
    /// Server base URL
    #[arg(long, env = "AUTHGATE_URL", default_value = "http://127.0.0.1:8000")]
    url: String,

    /// File the access token is saved to between runs
    #[arg(long, env = "AUTHGATE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange a username/password for an access token and save it
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the claims carried by a token (signature is NOT checked)
    Inspect {
        #[arg(long, env = "AUTHGATE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Add two numbers through the protected endpoint
    Calculate {
        #[arg(long, env = "AUTHGATE_TOKEN", hide_env_values = true)]
        token: Option<String>,
        #[arg(short, allow_negative_numbers = true)]
        a: i64,
        #[arg(short, allow_negative_numbers = true)]
        b: i64,
    },
    /// Discard the saved token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = match args.token_file {
        Some(path) => TokenStore::at(path),
        None => TokenStore::default_location()?,
    };
    debug!("Token file: {}", store.path().display());

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;
    let base = args.url.trim_end_matches('/');

    match args.command {
        Command::Login { username, password } => {
            debug!("Logging in to {} as {}", base, username);
            let res = client
                .post(format!("{}/login", base))
                .form(&[("username", username.as_str()), ("password", password.as_str())])
                .send()
                .await
                .context("Login request failed")?;

            if !res.status().is_success() {
                bail!("Login failed: {}", error_detail(res).await);
            }

            let login: LoginResponse = res.json().await.context("Malformed login response")?;
            store.save(&login.access_token)?;

            println!("{}", login.access_token);
            eprint!("{}", describe_token(&login.access_token, Utc::now())?);
            eprintln!("saved to:   {}", store.path().display());
        }
        Command::Inspect { token } => {
            let token = resolve_token(token, &store)?;
            eprint!("{}", describe_token(&token, Utc::now())?);
        }
        Command::Calculate { token, a, b } => {
            let token = resolve_token(token, &store)?;
            let res = client
                .get(format!("{}/calculate", base))
                .query(&[("a", a), ("b", b)])
                .bearer_auth(&token)
                .send()
                .await
                .context("Calculate request failed")?;

            if res.status() == reqwest::StatusCode::UNAUTHORIZED {
                bail!(
                    "Token rejected ({}); run `authgate-client login` again",
                    error_detail(res).await
                );
            }
            if !res.status().is_success() {
                bail!(
                    "Calculation refused ({}): {}",
                    res.status(),
                    error_detail(res).await
                );
            }

            let calc: Calculation = res.json().await.context("Malformed calculate response")?;
            println!("{} + {} = {} (as {})", a, b, calc.result, calc.user);
        }
        Command::Logout => {
            if store.clear()? {
                eprintln!("Logged out");
            } else {
                eprintln!("No saved token");
            }
        }
    }

    Ok(())
}

async fn error_detail(res: reqwest::Response) -> String {
    let status = res.status();
    match res.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => status.to_string(),
    }
}
