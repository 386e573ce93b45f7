//! Client-side token handling
//!
//! Keeps the last issued token between `authgate-client` runs and renders a
//! summary of its claims. Claims shown here are decoded without verification;
//! only the server decides whether a token is still good.
//!
//! The token is stored at `~/.config/authgate/token`, readable by its owner only.

use crate::auth::{parse_claims_unverified, Claims};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Application name used for the config directory path
const APP_NAME: &str = "authgate";

/// Token file name
const TOKEN_FILE: &str = "token";

/// On-disk home of the current access token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/authgate/token`
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(Self::at(config_dir.join(APP_NAME).join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the saved token. The file is created with mode 0600 on unix.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        // mode() only applies on create; tighten a pre-existing file as well
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .context("Failed to restrict token file permissions")?;
        }

        file.write_all(token.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// The saved token, or `None` if nobody is logged in
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    /// Discard the saved token. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// Pick the token to send: an explicit one wins over the saved one
pub fn resolve_token(explicit: Option<String>, store: &TokenStore) -> Result<String> {
    if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }
    match store.load()? {
        Some(token) => Ok(token),
        None => bail!("Not logged in: run `authgate-client login` or pass --token"),
    }
}

/// Human-readable summary of a token's claims as of `now`
pub fn describe_claims(claims: &Claims, now: DateTime<Utc>) -> String {
    let mut out = format!("user:       {}\n", claims.sub);

    let Some(expires_at) = DateTime::from_timestamp(claims.exp, 0) else {
        out.push_str(&format!("expires at: {} (out of range)\n", claims.exp));
        out.push_str("status:     invalid\n");
        return out;
    };
    out.push_str(&format!("expires at: {}\n", expires_at.to_rfc3339()));

    let remaining = expires_at - now;
    if remaining.num_seconds() > 0 {
        out.push_str(&format!(
            "remaining:  {}m {:02}s\n",
            remaining.num_minutes(),
            remaining.num_seconds() % 60
        ));
    } else {
        out.push_str("status:     expired\n");
    }
    out
}

/// Decode a token without verification and describe it
pub fn describe_token(token: &str, now: DateTime<Utc>) -> Result<String> {
    let claims = parse_claims_unverified(token)?;
    Ok(describe_claims(&claims, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtHandler;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn create_test_store() -> (TokenStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().join("authgate").join("token"));
        (store, dir)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.load().unwrap(), None);

        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

        store.save("second.token.here").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second.token.here"));
    }

    #[test]
    fn test_load_trims_and_ignores_blank() {
        let (store, _dir) = create_test_store();

        store.save("  abc.def.ghi\n").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

        store.save("\n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_discards_token() {
        let (store, _dir) = create_test_store();
        store.save("abc.def.ghi").unwrap();

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());

        // Logging out twice is not an error
        assert!(!store.clear().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = create_test_store();
        store.save("abc.def.ghi").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // A pre-existing world-readable file gets tightened too
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.save("next.token.value").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_resolve_token_prefers_explicit() {
        let (store, _dir) = create_test_store();
        store.save("saved.token.value").unwrap();

        assert_eq!(
            resolve_token(Some("explicit.token".to_string()), &store).unwrap(),
            "explicit.token"
        );
        assert_eq!(resolve_token(None, &store).unwrap(), "saved.token.value");
        assert_eq!(resolve_token(Some("  ".to_string()), &store).unwrap(), "saved.token.value");
    }

    #[test]
    fn test_resolve_token_requires_login() {
        let (store, _dir) = create_test_store();
        let err = resolve_token(None, &store).unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }

    #[test]
    fn test_describe_remaining_lifetime() {
        let claims = Claims {
            sub: "vinod".to_string(),
            exp: (now() + Duration::minutes(12) + Duration::seconds(5)).timestamp(),
        };

        let text = describe_claims(&claims, now());
        assert!(text.contains("user:       vinod"));
        assert!(text.contains("expires at: 2026-03-01T12:12:05+00:00"));
        assert!(text.contains("remaining:  12m 05s"));
        assert!(!text.contains("expired"));
    }

    #[test]
    fn test_describe_expired() {
        let claims = Claims {
            sub: "vinod".to_string(),
            exp: now().timestamp(),
        };
        let text = describe_claims(&claims, now());
        assert!(text.contains("status:     expired"));
        assert!(!text.contains("remaining"));

        let long_gone = describe_claims(&claims, now() + Duration::hours(3));
        assert!(long_gone.contains("status:     expired"));
    }

    #[test]
    fn test_describe_out_of_range_exp() {
        let claims = Claims {
            sub: "vinod".to_string(),
            exp: i64::MAX,
        };
        let text = describe_claims(&claims, now());
        assert!(text.contains("out of range"));
    }

    #[test]
    fn test_describe_token_reads_unverified_claims() {
        let issued = JwtHandler::new(b"client-test-secret")
            .generate_token_at("vinod", now())
            .unwrap();

        let text = describe_token(&issued.token, now() + Duration::minutes(10)).unwrap();
        assert!(text.contains("user:       vinod"));
        assert!(text.contains("remaining:  20m 00s"));

        assert!(describe_token("not-a-token", now()).is_err());
    }
}
