//! # Knobs Common
//!
//! Foundational types shared by every Knobs crate: the parameter data model,
//! raw-input parsing, validation and the error vocabulary used to report
//! validation problems without leaking sensitive values.
//!
//! ## Modules
//!
//! - [`constants`] - Shared defaults
//! - [`error`] - Error severity classification and error-chain formatting
//! - [`logging`] - Log formatting helpers
//! - [`parameters`] - Parameter definitions, parsing and validation
//! - [`prompt_spec`] - Prompt configuration attached to a parameter

pub mod constants;
pub mod error;
pub mod logging;
pub mod parameters;
pub mod prompt_spec;

pub use constants::{DEFAULT_RETRIES, REDACTED_PLACEHOLDER};
pub use error::{ErrorChain, ErrorChainExt, ErrorSeverity, Severity};
pub use logging::Pretty;
pub use parameters::*;
pub use prompt_spec::{LinkState, PromptSpec, PromptTiming, RepeatPolicy, RetryBound};
