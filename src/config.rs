use std::net::IpAddr;
use std::path::PathBuf;

use crate::auth::jwt::MAX_TOKEN_TTL_MINUTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub token_ttl_minutes: i64,
    pub admin_registration: AdminRegistration,
    pub max_body_size: usize,
    pub cors_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub db_max_connections: u32,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminRegistration {
    /// Anyone may register an Admin account.
    Open,
    /// Only the first Admin may self-register.
    Bootstrap,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("MEDLOCATOR_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid MEDLOCATOR_HOST: {e}"))?;

        let port: u16 = env_or("MEDLOCATOR_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid MEDLOCATOR_PORT: {e}"))?;

        let token_ttl_minutes = parse_token_ttl(&env_or("MEDLOCATOR_TOKEN_TTL_MINUTES", "60"))?;

        let admin_registration =
            parse_admin_registration(&env_or("MEDLOCATOR_ADMIN_REGISTRATION", "bootstrap"));

        let max_body_size: usize = env_or("MEDLOCATOR_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid MEDLOCATOR_MAX_BODY_SIZE: {e}"))?;

        let cors_origins = split_list(&env_or("MEDLOCATOR_CORS_ORIGINS", ""));

        let static_dir = std::env::var("MEDLOCATOR_STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let db_max_connections: u32 = env_or("MEDLOCATOR_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid MEDLOCATOR_DB_MAX_CONNECTIONS: {e}"))?;

        let log_level = env_or("MEDLOCATOR_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            token_ttl_minutes,
            admin_registration,
            max_body_size,
            cors_origins,
            static_dir,
            db_max_connections,
            log_level,
        })
    }
}

fn parse_token_ttl(value: &str) -> Result<i64, String> {
    let minutes: i64 = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid MEDLOCATOR_TOKEN_TTL_MINUTES: {e}"))?;
    if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
        return Err(format!(
            "MEDLOCATOR_TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
        ));
    }
    Ok(minutes)
}

fn parse_admin_registration(value: &str) -> AdminRegistration {
    match value.trim().to_lowercase().as_str() {
        "open" => AdminRegistration::Open,
        _ => AdminRegistration::Bootstrap,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
