pub mod analysis;
pub mod commands;
pub mod config;
pub mod github;
pub mod output;
pub mod runtime;
pub mod server;
pub mod service;
