//! typesmith-cli - Command implementations behind the `typesmith` binary
//!
//! Exposed as a library so integration tests can drive the commands
//! without spawning a process.

pub mod generate;
pub mod schema;
