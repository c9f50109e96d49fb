//! Process exit codes

/// Everything succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// A prompt, a value or the command itself failed
pub const EXIT_ERROR: i32 = 1;

/// The manifest or configuration could not be loaded or registered
pub const EXIT_CONFIG_ERROR: i32 = 2;
