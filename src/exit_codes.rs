//! Stable exit codes for driver CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed: bad descriptor, unknown module, declined overwrite, etc.
pub const FAILURE: i32 = 1;
