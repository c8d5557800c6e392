//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - manifest contents are not acceptable
pub const VALIDATION_ERROR: i32 = 2;

/// IO error - file not readable or writable
pub const IO_ERROR: i32 = 5;

/// Dependency error - upstream descriptor could not be fetched (EX_UNAVAILABLE)
pub const DEPENDENCY_ERROR: i32 = 69;

/// External process error - generator or packager failed (EX_SOFTWARE)
pub const PROCESS_ERROR: i32 = 70;

/// Configuration error - missing checkout, tool, manifest or template (EX_CONFIG)
pub const CONFIG_ERROR: i32 = 78;
