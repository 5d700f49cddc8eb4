// Domain layer - Pure types with no I/O
pub mod fetch;
pub mod panel;
pub mod render;
pub mod saved;
pub mod theme;
