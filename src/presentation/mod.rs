// Presentation layer - Terminal shell over the application services
pub mod app_state;
pub mod commands;
pub mod handlers;
pub mod render;
pub mod shell;
