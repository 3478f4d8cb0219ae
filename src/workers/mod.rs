pub mod repo_refresh;

pub use repo_refresh::run_repo_refresh;
