use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::scheduling::SchedulePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub op_timeout: Duration,
    pub policy: SchedulePolicy,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a local `.env`.
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://timetable.db".to_string());
        let bind_addr = parse_var("BIND_ADDR", "127.0.0.1:3000")?;
        let max_connections = parse_var("DB_MAX_CONNECTIONS", "5")?;
        let op_timeout_ms: u64 = parse_var("OP_TIMEOUT_MS", "5000")?;

        let lab_block_periods: u8 = parse_var("LAB_BLOCK_PERIODS", "1")?;
        if !(1..=SchedulePolicy::MAX_LAB_BLOCK_PERIODS).contains(&lab_block_periods) {
            return Err(ConfigError::Invalid {
                key: "LAB_BLOCK_PERIODS",
                value: lab_block_periods.to_string(),
                reason: format!("must be between 1 and {}", SchedulePolicy::MAX_LAB_BLOCK_PERIODS),
            });
        }

        let policy = SchedulePolicy {
            lab_block_periods,
            lab_block_within_half_day: parse_var("LAB_BLOCK_WITHIN_HALF_DAY", "true")?,
            lab_room_overflow: parse_var("LAB_ROOM_OVERFLOW", "true")?,
            subject_half_day_separation: parse_var("SUBJECT_HALF_DAY_SEPARATION", "false")?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            op_timeout: Duration::from_millis(op_timeout_ms),
            policy,
        })
    }
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}
