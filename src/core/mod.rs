//! Configuration and the invocation data model shared by every module.

pub mod config;
pub mod models;
