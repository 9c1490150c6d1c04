pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod geo;
pub mod models;
pub mod observability;
pub mod state;
