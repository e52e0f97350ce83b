pub mod api;
pub mod cli;
pub mod config;
pub mod editor;
pub mod tui;
pub mod ui;
pub mod validation;
