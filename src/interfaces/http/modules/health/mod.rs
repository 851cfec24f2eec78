//! Liveness endpoint backed by a database ping

pub mod handlers;

pub use handlers::*;
