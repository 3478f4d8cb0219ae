pub mod api;
pub mod application;
pub mod carousel;
pub mod config;
pub mod content;
pub mod domain;
pub mod events;
pub mod github;
pub mod infrastructure;
pub mod state;
pub mod workers;
