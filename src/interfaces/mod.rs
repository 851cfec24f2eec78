//! Interfaces layer - REST API

pub mod http;
