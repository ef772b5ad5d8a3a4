//! CLI command implementations

pub mod utils;

pub mod calc;
pub mod cert;
pub mod completions;
pub mod init;
pub mod list;
pub mod range;
