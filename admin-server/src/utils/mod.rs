//! Utility modules

pub mod logger;
pub mod password;

pub use logger::init_logger_with_file;
