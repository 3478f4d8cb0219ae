pub mod loader;
pub mod models;

pub use loader::{ContentError, ContentLoader};
pub use models::*;
