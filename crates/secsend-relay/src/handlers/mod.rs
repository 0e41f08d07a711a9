//! HTTP handlers for the `/v1` endpoints, one module per verb group.

pub mod config;
pub mod delete;
pub mod download;
pub mod upload;
