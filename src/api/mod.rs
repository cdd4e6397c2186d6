//! HTTP API: handlers, DTOs, routes and middleware

pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod streamers;
pub mod types;

pub use routes::api_routes;
