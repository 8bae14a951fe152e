//! Core libdesk library (staff auth, config, logging).

pub mod auth;
pub mod config;
pub mod logging;
