//! Library components of the Titanic passenger service: backend
//! configuration, the HTTP router, terminal rendering, and logging setup.

#![deny(unsafe_code)]

pub mod config;
pub mod http;
pub mod logging;
pub mod render;
