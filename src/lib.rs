pub mod api;
pub mod config;
pub mod error;
pub mod feedback;
pub mod joke;
pub mod model;
pub mod ui;
