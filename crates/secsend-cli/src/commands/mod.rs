//! Command implementations

pub mod config_cmd;
pub mod delete;
pub mod receive;
pub mod send;
