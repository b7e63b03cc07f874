// Declare all modules as public so they can be used by the binary and tests.
pub mod config;
pub mod core;
pub mod utils;
