//! Engine Configuration
//!
//! Settings shared by providers and animations, read from the environment
//! or set explicitly by the host.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Environment variable holding the animation slowdown factor
pub const SLOWDOWN_ENV: &str = "SLOWDOWN";

/// Environment variable holding debug flags
pub const DEBUG_ENV: &str = "FOS_THEME_DEBUG";

/// Engine configuration options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Divides the speed of every animation (2.0 runs twice as slow)
    pub slowdown: f64,

    /// Keep source sections for every parsed declaration
    pub keep_css_sections: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slowdown: 1.0,
            keep_css_sections: false,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from `SLOWDOWN` and `FOS_THEME_DEBUG`
    pub fn from_env() -> Self {
        let slowdown = std::env::var(SLOWDOWN_ENV).ok();
        let debug = std::env::var(DEBUG_ENV).ok();
        Self::from_vars(slowdown.as_deref(), debug.as_deref())
    }

    fn from_vars(slowdown: Option<&str>, debug: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = slowdown {
            match raw.trim().parse::<f64>() {
                Ok(factor) if factor.is_finite() && factor > 0.0 => config.slowdown = factor,
                _ => tracing::warn!(value = raw, "ignoring invalid {}", SLOWDOWN_ENV),
            }
        }

        if let Some(flags) = debug {
            config.keep_css_sections = flags
                .split(|c: char| c == ',' || c == ':' || c.is_whitespace())
                .any(|flag| flag.eq_ignore_ascii_case("sections"));
        }

        config
    }
}

// Stores the f64 bits; zero means "not initialised yet".
static SLOWDOWN: AtomicU64 = AtomicU64::new(0);
static ENV_DEFAULTS: OnceLock<EngineConfig> = OnceLock::new();

/// Process-wide defaults, read from the environment once
pub fn process_defaults() -> EngineConfig {
    let mut config = *ENV_DEFAULTS.get_or_init(EngineConfig::from_env);
    config.slowdown = slowdown();
    config
}

/// Current process-wide slowdown factor
pub fn slowdown() -> f64 {
    match SLOWDOWN.load(Ordering::Relaxed) {
        0 => ENV_DEFAULTS.get_or_init(EngineConfig::from_env).slowdown,
        bits => f64::from_bits(bits),
    }
}

/// Change the process-wide slowdown factor.
///
/// Returns `false` and leaves the factor untouched unless `factor` is a
/// finite number greater than zero.
pub fn set_slowdown(factor: f64) -> bool {
    if !factor.is_finite() || factor <= 0.0 {
        tracing::warn!(factor, "rejecting slowdown factor");
        return false;
    }
    SLOWDOWN.store(factor.to_bits(), Ordering::Relaxed);
    true
}
