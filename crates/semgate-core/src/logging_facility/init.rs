//! Logging initialization module

use std::io::IsTerminal;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Default directive when `RUST_LOG` is unset; stderr then carries only the
/// `INFO:`/`ERROR:` diagnostic lines
const DEFAULT_FILTER: &str = "off";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output
    Development,
    /// JSON structured output for CI log collectors
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Pick a profile from the value of `SEMGATE_LOG_FORMAT`
    pub fn from_format(format: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => Profile::Production,
            _ => Profile::Development,
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging facility
///
/// Call once at startup. Later calls are no-ops.
///
/// # Profiles
///
/// - **Development**: human-readable logs on stderr
/// - **Production**: JSON structured logs on stderr
/// - **Test**: bare registry; use `init_test_capture()` to assert on events
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_env_filter(env_filter())
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter())
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
