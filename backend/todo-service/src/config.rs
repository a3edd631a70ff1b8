//! Configuration management for Todo Service
//!
//! Loads settings from:
//! 1. `.env.test` when `TEST_MODE=true`, `.env` otherwise, searched from the
//!    working directory upward, then from the crate directory
//! 2. Environment variables
//!
//! The settings object is built once at startup and handed by reference to
//! the components that need it.
//!
//! # Example
//!
//! ```no_run
//! use todo_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("gRPC port: {}", settings.server.port);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub auth: AuthSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from the environment, reading the env file first
    pub fn load() -> Result<Self> {
        load_env_file();

        Ok(Settings {
            auth: AuthSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            server: ServerSettings::from_env()?,
        })
    }
}

fn load_env_file() {
    let test_mode = env::var("TEST_MODE")
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let file = if test_mode { ".env.test" } else { ".env" };

    let found = env::current_dir()
        .ok()
        .and_then(|cwd| find_env_file(&cwd, file))
        .or_else(|| find_env_file(Path::new(env!("CARGO_MANIFEST_DIR")), file));

    let Some(path) = found else {
        debug!(file, "No env file found, using process environment");
        return;
    };

    match dotenvy::from_path(&path) {
        Ok(()) => info!(path = %path.display(), "Loaded env file"),
        Err(err) => warn!(path = %path.display(), error = %err, "Env file could not be read"),
    }
}

/// First `name` found in `start` or any of its ancestors
fn find_env_file(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Token signing and role policy
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub required_role: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("required_role", &self.required_role)
            .finish()
    }
}

impl AuthSettings {
    fn from_env() -> Result<Self> {
        Self::from_values(
            env::var("JWT_SECRET").ok(),
            env::var("ROLE_USER").ok(),
        )
    }

    fn from_values(jwt_secret: Option<String>, required_role: Option<String>) -> Result<Self> {
        let jwt_secret = jwt_secret.context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            jwt_secret,
            required_role: required_role
                .filter(|role| !role.is_empty())
                .unwrap_or_else(|| "user".to_string()),
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
        })
    }
}

/// gRPC listener settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("GRPC_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GRPC_PORT")
                .unwrap_or_else(|_| "50051".to_string())
                .parse()
                .context("Invalid GRPC_PORT")?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
