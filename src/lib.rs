pub mod config;
pub mod dispatcher;
pub mod platform;
pub mod rules;
pub mod server;
