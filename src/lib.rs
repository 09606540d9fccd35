pub mod app;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod pdf;
pub mod plan;
pub mod state;
