// Application layer - Use cases over the domain, behind ports
pub mod dispatcher;
pub mod features;
pub mod grid_service;
pub mod http_source;
pub mod options_service;
pub mod output_board;
pub mod saved_service;
pub mod state_store;
pub mod theme_service;
