//! System-level modules
//!
//! Logging initialization lives here; the rest of the crate stays free of
//! subscriber setup.

pub mod logging;

pub use logging::init_logging;
