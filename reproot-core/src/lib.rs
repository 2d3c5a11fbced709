//! reproot-core: Shared infrastructure for the RepRoot job portal service.

pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
