//! name_origin_server - REST surface for name-origin predictions.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
