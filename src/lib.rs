pub mod config;
pub mod dialog;
pub mod logging;
pub mod store;
pub mod tasks;
pub mod tui;
pub mod validate;
pub mod view;
