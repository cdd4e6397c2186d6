//! Service layer for business logic
//!
//! This module provides unified business logic shared between the HTTP
//! handlers and the CLI.

mod health;
mod streamer_service;

pub use health::*;
pub use streamer_service::*;
