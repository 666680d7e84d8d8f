//! Interactive terminal surface: reads user input, drives the core state
//! machine and shows the resulting view.
mod app;
mod config;
mod effects;
mod ui;

pub use app::run_app;
