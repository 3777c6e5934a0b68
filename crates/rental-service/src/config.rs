//! Configuration for the rental service.
//!
//! [`RentalPolicy`] holds the business constants of the lifecycle (hold time, grace period,
//! penalty rate); [`RentalConfig`] adds the runtime knobs around it. Both come with a
//! `DEFAULT` preset matching the shop's published terms, a validating constructor, and can
//! be overridden from `RENTAL_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised while building a configuration.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Cannot parse {key}={value:?}")]
    Parse { key: &'static str, value: String },
}

/// Business rules of the rental lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalPolicy {
    /// How long a reservation waits for pickup before it is cancelled.
    pub hold_minutes: u32,
    /// Minutes past the booked duration a return is still on time.
    pub grace_minutes: u32,
    /// Penalty per minute of delay, in currency units.
    pub penalty_per_minute: f64,
    /// Minor units per currency unit; pendency values are stored in minor units.
    pub currency_minor_units: f64,
    /// Length of generated pickup codes.
    pub code_length: usize,
    /// Attempts at issuing a pickup code that no live rental holds.
    pub max_code_attempts: u32,
    /// Safety bound on claim attempts. Each lost attempt means another reservation got a
    /// unit, so this is only reached under extreme contention.
    pub max_claim_attempts: u32,
}

impl Default for RentalPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RentalPolicy {
    pub const DEFAULT: Self = Self {
        hold_minutes: 60,
        grace_minutes: 10,
        penalty_per_minute: 0.25,
        currency_minor_units: 100.0,
        code_length: 6,
        max_code_attempts: 16,
        max_claim_attempts: 1_024,
    };

    /// Checks every field, returning the policy unchanged when it is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.hold_minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "hold_minutes must be positive".to_string(),
            ));
        }
        if !self.penalty_per_minute.is_finite() || self.penalty_per_minute < 0.0 {
            return Err(ConfigError::InvalidValue(
                "penalty_per_minute must be a non-negative number".to_string(),
            ));
        }
        if !self.currency_minor_units.is_finite() || self.currency_minor_units <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "currency_minor_units must be positive".to_string(),
            ));
        }
        if self.code_length == 0 {
            return Err(ConfigError::InvalidValue(
                "code_length must be positive".to_string(),
            ));
        }
        if self.max_code_attempts == 0 || self.max_claim_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "retry bounds must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// The reservation hold as a timestamp offset.
    pub fn hold(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.hold_minutes))
    }

    /// The reservation hold as a timer duration.
    pub fn hold_timer(&self) -> Duration {
        Duration::from_secs(u64::from(self.hold_minutes) * 60)
    }

    /// Pendency value for a return `delay_minutes` past the booked duration.
    pub fn penalty(&self, delay_minutes: i64) -> f64 {
        delay_minutes as f64 * self.penalty_per_minute * self.currency_minor_units
    }
}

/// Runtime configuration of a [`RentalSystem`](crate::lifecycle::RentalSystem).
#[derive(Debug, Clone, PartialEq)]
pub struct RentalConfig {
    pub policy: RentalPolicy,
    /// Period of the expiry sweeper; `None` disables it (per-reservation timers still run).
    pub sweep_interval: Option<Duration>,
    /// Request buffer of each store actor.
    pub channel_capacity: usize,
    /// Where the demo binary loads and saves its snapshot.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RentalConfig {
    pub const DEFAULT: Self = Self {
        policy: RentalPolicy::DEFAULT,
        sweep_interval: Some(Duration::from_secs(60)),
        channel_capacity: 32,
        snapshot_path: None,
    };

    /// Create a new configuration with validation
    pub fn new(
        policy: RentalPolicy,
        sweep_interval: Option<Duration>,
        channel_capacity: usize,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let policy = policy.validate()?;
        if channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "channel_capacity must be positive".to_string(),
            ));
        }
        if sweep_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ConfigError::InvalidValue(
                "sweep_interval must be positive".to_string(),
            ));
        }
        Ok(Self {
            policy,
            sweep_interval,
            channel_capacity,
            snapshot_path,
        })
    }

    /// Reads overrides of [`RentalConfig::DEFAULT`] from the process environment.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `RENTAL_HOLD_MINUTES` | `policy.hold_minutes` |
    /// | `RENTAL_GRACE_MINUTES` | `policy.grace_minutes` |
    /// | `RENTAL_PENALTY_PER_MINUTE` | `policy.penalty_per_minute` |
    /// | `RENTAL_CURRENCY_MINOR_UNITS` | `policy.currency_minor_units` |
    /// | `RENTAL_CODE_LENGTH` | `policy.code_length` |
    /// | `RENTAL_SWEEP_INTERVAL_SECS` | `sweep_interval` (`0` disables) |
    /// | `RENTAL_CHANNEL_CAPACITY` | `channel_capacity` |
    /// | `RENTAL_SNAPSHOT_PATH` | `snapshot_path` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RentalConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = Self::DEFAULT;
        let policy = RentalPolicy {
            hold_minutes: parse_or(&lookup, "RENTAL_HOLD_MINUTES", base.policy.hold_minutes)?,
            grace_minutes: parse_or(&lookup, "RENTAL_GRACE_MINUTES", base.policy.grace_minutes)?,
            penalty_per_minute: parse_or(
                &lookup,
                "RENTAL_PENALTY_PER_MINUTE",
                base.policy.penalty_per_minute,
            )?,
            currency_minor_units: parse_or(
                &lookup,
                "RENTAL_CURRENCY_MINOR_UNITS",
                base.policy.currency_minor_units,
            )?,
            code_length: parse_or(&lookup, "RENTAL_CODE_LENGTH", base.policy.code_length)?,
            ..base.policy
        };

        let default_secs = base.sweep_interval.map_or(0, |interval| interval.as_secs());
        let sweep_secs: u64 = parse_or(&lookup, "RENTAL_SWEEP_INTERVAL_SECS", default_secs)?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        let channel_capacity =
            parse_or(&lookup, "RENTAL_CHANNEL_CAPACITY", base.channel_capacity)?;
        let snapshot_path = lookup("RENTAL_SNAPSHOT_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self::new(policy, sweep_interval, channel_capacity, snapshot_path)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse { key, value }),
        None => Ok(default),
    }
}
