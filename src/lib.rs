pub mod aggregate;
pub mod app;
pub mod config;
pub mod core;
pub mod data;
pub mod filter;
pub mod model;
pub mod ui;
