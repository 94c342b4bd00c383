pub mod access;
pub mod config;
pub mod database;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod state;
pub mod telemetry;
pub mod utils;
