use nomas_auth_types::token::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS};

/// Default accounts provisioned at startup when no override is given.
pub const DEFAULT_BOOTSTRAP_ADMINS: &str = "admin:admin,admin_2:admin_2";

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// Database connection URL (postgres or sqlite). Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8000). Env var: `API_PORT`.
    pub api_port: u16,
    /// HMAC secret for signing JWTs. Env var: `JWT_SECRET`.
    pub jwt: JwtSettings,
    /// bcrypt work factor. Env var: `BCRYPT_COST`.
    pub bcrypt_cost: u32,
    /// Accounts ensured at startup. Env var: `BOOTSTRAP_ADMINS`, `user:pass` pairs
    /// separated by commas.
    pub bootstrap_admins: Vec<AdminSeed>,
    /// Apply pending migrations before serving (default true). Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

/// Token signing key and lifetimes.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_ttl_secs: REFRESH_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: parsed_var("API_PORT").unwrap_or(8000),
            jwt: JwtSettings {
                secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
                access_ttl_secs: parsed_var("ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or(ACCESS_TOKEN_TTL_SECS),
                refresh_ttl_secs: parsed_var("REFRESH_TOKEN_TTL_SECS")
                    .unwrap_or(REFRESH_TOKEN_TTL_SECS),
            },
            bcrypt_cost: parsed_var("BCRYPT_COST").unwrap_or(bcrypt::DEFAULT_COST),
            bootstrap_admins: parse_admins(
                &std::env::var("BOOTSTRAP_ADMINS")
                    .unwrap_or_else(|_| DEFAULT_BOOTSTRAP_ADMINS.to_owned()),
            ),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Parse `user:pass,user2:pass2`. Entries without a colon or with an empty
/// username are skipped; the password may itself contain colons.
pub fn parse_admins(value: &str) -> Vec<AdminSeed> {
    value
        .split(',')
        .filter_map(|entry| {
            let (username, password) = entry.trim().split_once(':')?;
            let username = username.trim();
            if username.is_empty() {
                return None;
            }
            Some(AdminSeed {
                username: username.to_owned(),
                password: password.to_owned(),
            })
        })
        .collect()
}
