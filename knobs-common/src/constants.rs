//! # Shared Constants
//!
//! Defaults shared by the engine, the configuration layer and the CLI so the
//! same value is never spelled twice.

/// Retries allowed after the first failed prompt attempt when neither the
/// parameter nor the session configures a bound.
///
/// Two retries give three attempts in total.
pub const DEFAULT_RETRIES: i64 = 2;

/// Text shown in place of a sensitive value.
pub const REDACTED_PLACEHOLDER: &str = "********";

/// Prefix for environment variables read by the configuration layer.
pub const ENV_PREFIX: &str = "KNOBS_";

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".knobs";
