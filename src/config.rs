use crate::navigation::DEFAULT_COOLDOWN_MS;
use crate::storage::resolve_data_dir;
use chrono::Duration;
use std::{env, path::PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub nav_cooldown: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir: resolve_data_dir(),
            port: env_number("PORT", 8080),
            nav_cooldown: Duration::milliseconds(env_number("NAV_COOLDOWN_MS", DEFAULT_COOLDOWN_MS)),
        }
    }
}

fn env_number<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {name}={value:?}, using {default}");
            default
        }),
        Err(_) => default,
    }
}
